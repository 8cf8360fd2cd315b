use serde_json::{json, Value};

pub const HOME: &str = "/home/tester";

pub fn session() -> Value {
    json!({
        "alt-speed-down": 50,
        "alt-speed-enabled": false,
        "alt-speed-up": 50,
        "blocklist-enabled": false,
        "blocklist-size": 0,
        "cache-size-mb": 4,
        "config-dir": "/home/tester/.config/transmission-daemon",
        "dht-enabled": true,
        "download-dir": "/home/tester/Downloads",
        "download-dir-free-space": 52613349376u64,
        "encryption": "preferred",
        "idle-seeding-limit": 30,
        "peer-limit-global": 200,
        "peer-port": 51413,
        "rpc-version": 15,
        "seedRatioLimit": 2,
        "speed-limit-down": 100,
        "speed-limit-down-enabled": false,
        "utp-enabled": true,
        "version": "2.94 (d8e60ee44f)",
        "units": {
            "speed-bytes": 1000,
            "speed-units": ["kB/s", "MB/s", "GB/s", "TB/s"],
            "memory-bytes": 1024,
            "memory-units": ["KiB", "MiB", "GiB", "TiB"],
            "size-bytes": 1000,
            "size-units": ["kB", "MB", "GB", "TB"]
        }
    })
}

pub fn torrent(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": 4,
        "downloadDir": "/home/tester/Downloads",
        "eta": 3725,
        "percentDone": 0.25,
        "rateDownload": 2048,
        "uploadLimit": 100,
        "uploadLimited": false,
        "peer-limit": 50,
        "files": [
            {"bytesCompleted": 0, "length": 1073741824, "name": format!("{name}/disc1.iso")},
            {"bytesCompleted": 512, "length": 1024, "name": format!("{name}/README")}
        ],
        "peersFrom": {"fromDht": 3, "fromPex": 1, "fromTracker": 12},
        "trackers": [{"announce": "http://tracker.example/announce", "id": 0, "tier": 0}],
        "wanted": [true, false]
    })
}
