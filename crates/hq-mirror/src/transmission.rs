//! The BitTorrent daemon's RPC schema: every session and torrent field with
//! its type tag, mutability and hooks.
//!
//! The daemon speaks kB/s for speed limits and MiB for the cache size; the
//! hooks convert those to plain bytes on the way in and back on the way out.

use std::sync::{Arc, OnceLock};

use hq_format::TypeTag;
use serde_json::{json, Value};

use crate::registry::Schema;
use crate::spec::{FieldSpec, ScalarSpec};

pub const SESSION: &str = "session";
pub const TORRENT: &str = "torrent";

/// Identifier field of torrents.
pub const TORRENT_ID: &str = "id";

const KILO: i64 = 1000;
const MEBI: i64 = 1024 * 1024;

const STATUS: [&str; 7] = [
    "paused",
    "will verify",
    "verifying",
    "will download",
    "downloading",
    "will seed",
    "seeding",
];

// ── Hooks ─────────────────────────────────────────────────────────────────

fn scale_up(value: &Value, factor: i64) -> Value {
    if let Some(n) = value.as_i64() {
        return json!(n.saturating_mul(factor));
    }
    match value.as_f64() {
        Some(f) => json!((f * factor as f64).round() as i64),
        None => value.clone(),
    }
}

fn scale_down(value: &Value, factor: i64) -> Value {
    match value.as_f64() {
        Some(f) => json!((f / factor as f64).round() as i64),
        None => value.clone(),
    }
}

/// kB (daemon) to bytes.
pub fn kilo_to_bytes(value: &Value) -> Value {
    scale_up(value, KILO)
}

/// Bytes to kB (daemon), rounded.
pub fn bytes_to_kilo(value: &Value) -> Value {
    scale_down(value, KILO)
}

/// MiB (daemon) to bytes.
pub fn mebi_to_bytes(value: &Value) -> Value {
    scale_up(value, MEBI)
}

/// Bytes to MiB (daemon), rounded.
pub fn bytes_to_mebi(value: &Value) -> Value {
    scale_down(value, MEBI)
}

/// Torrent status code to its name. Unknown codes pass through.
pub fn torrent_status(value: &Value) -> Value {
    value
        .as_u64()
        .and_then(|code| STATUS.get(code as usize))
        .map_or_else(|| value.clone(), |name| json!(name))
}

// ── Field helpers ─────────────────────────────────────────────────────────

fn ro(tag: TypeTag) -> FieldSpec {
    FieldSpec::scalar(tag, false)
}

fn rw(tag: TypeTag) -> FieldSpec {
    FieldSpec::scalar(tag, true)
}

/// A writable speed limit the daemon reports in kB/s.
fn kilo_rate() -> FieldSpec {
    ScalarSpec::new(TypeTag::BytesRate, true)
        .on_update(kilo_to_bytes)
        .on_write(bytes_to_kilo)
        .into()
}

fn unit_names() -> FieldSpec {
    FieldSpec::list(ro(TypeTag::Str))
}

// ── Sections ──────────────────────────────────────────────────────────────

fn session() -> FieldSpec {
    use TypeTag::*;
    FieldSpec::record([
        ("alt-speed-down", kilo_rate()),
        ("alt-speed-enabled", rw(Boolean)),
        ("alt-speed-time-begin", rw(Date)),
        ("alt-speed-time-enabled", rw(Boolean)),
        ("alt-speed-time-end", rw(Date)),
        ("alt-speed-time-day", rw(Int)),
        ("alt-speed-up", kilo_rate()),
        ("blocklist-url", rw(Url)),
        ("blocklist-enabled", rw(Boolean)),
        ("blocklist-size", ro(Int)),
        (
            "cache-size-mb",
            ScalarSpec::new(BytesSize, true)
                .on_update(mebi_to_bytes)
                .on_write(bytes_to_mebi)
                .into(),
        ),
        ("config-dir", ro(PathDir)),
        ("download-dir", rw(PathDir)),
        ("download-dir-free-space", ro(BytesSize)),
        ("download-queue-size", rw(Int)),
        ("download-queue-enabled", rw(Boolean)),
        ("dht-enabled", rw(Boolean)),
        ("encryption", rw(Str)),
        ("idle-seeding-limit", rw(Timespan)),
        ("idle-seeding-limit-enabled", rw(Boolean)),
        ("incomplete-dir", rw(PathDir)),
        ("incomplete-dir-enabled", rw(Boolean)),
        ("lpd-enabled", rw(Boolean)),
        ("peer-limit-global", rw(Int)),
        ("peer-limit-per-torrent", rw(Int)),
        ("pex-enabled", rw(Boolean)),
        ("peer-port", rw(Int)),
        ("peer-port-random-on-start", rw(Boolean)),
        ("port-forwarding-enabled", rw(Boolean)),
        ("queue-stalled-enabled", rw(Boolean)),
        ("queue-stalled-minutes", rw(Timespan)),
        ("rename-partial-files", rw(Boolean)),
        ("rpc-version", ro(Int)),
        ("rpc-version-minimum", ro(Int)),
        ("script-torrent-done-filename", rw(PathFile)),
        ("script-torrent-done-enabled", rw(Boolean)),
        ("seedRatioLimit", rw(Ratio)),
        ("seedRatioLimited", rw(Boolean)),
        ("seed-queue-size", rw(Int)),
        ("seed-queue-enabled", rw(Boolean)),
        ("speed-limit-down", kilo_rate()),
        ("speed-limit-down-enabled", rw(Boolean)),
        ("speed-limit-up", kilo_rate()),
        ("speed-limit-up-enabled", rw(Boolean)),
        ("start-added-torrents", rw(Boolean)),
        ("trash-original-torrent-files", rw(Boolean)),
        ("utp-enabled", rw(Boolean)),
        ("version", ro(Str)),
        (
            "units",
            FieldSpec::record([
                ("speed-bytes", rw(Int)),
                ("speed-units", unit_names()),
                ("memory-bytes", rw(Int)),
                ("memory-units", unit_names()),
                ("size-bytes", rw(Int)),
                ("size-units", unit_names()),
            ]),
        ),
    ])
}

fn torrent() -> FieldSpec {
    use TypeTag::*;
    FieldSpec::record([
        ("activityDate", ro(Date)),
        ("addedDate", ro(Date)),
        ("bandwidthPriority", rw(Int)),
        ("comment", ro(Str)),
        ("corruptEver", ro(BytesSize)),
        ("creator", ro(Str)),
        ("dateCreated", ro(Date)),
        ("desiredAvailable", ro(BytesSize)),
        ("doneDate", ro(Date)),
        ("downloadDir", ro(PathDir)),
        ("downloadedEver", ro(BytesSize)),
        ("downloadLimit", kilo_rate()),
        ("downloadLimited", rw(Boolean)),
        ("error", ro(Int)),
        ("errorString", ro(Str)),
        ("eta", ro(Timespan)),
        (
            "files",
            FieldSpec::list(FieldSpec::record([
                ("bytesCompleted", ro(BytesSize)),
                ("length", ro(BytesSize)),
                ("name", ro(Str)),
            ])),
        ),
        (
            "fileStats",
            FieldSpec::list(FieldSpec::record([
                ("bytesCompleted", ro(BytesSize)),
                ("wanted", ro(Boolean)),
                ("priority", ro(Int)),
            ])),
        ),
        ("hashString", ro(Str)),
        ("haveUnchecked", ro(BytesSize)),
        ("haveValid", ro(BytesSize)),
        ("honorsSessionLimits", rw(Boolean)),
        (TORRENT_ID, ro(Int)),
        ("isFinished", ro(Boolean)),
        ("isPrivate", ro(Boolean)),
        ("isStalled", ro(Boolean)),
        ("leftUntilDone", ro(BytesSize)),
        ("magnetLink", ro(Str)),
        ("manualAnnounceTime", ro(Timespan)),
        ("maxConnectedPeers", ro(Int)),
        ("metadataPercentComplete", ro(Percent)),
        ("name", ro(Str)),
        ("peer-limit", rw(Int)),
        (
            "peers",
            FieldSpec::list(FieldSpec::record([
                ("address", ro(Str)),
                ("clientName", ro(Str)),
                ("clientIsChoked", ro(Boolean)),
                ("clientIsInterested", ro(Boolean)),
                ("flagStr", ro(Str)),
                ("isDownloadingFrom", ro(Boolean)),
                ("isEncrypted", ro(Boolean)),
                ("isIncoming", ro(Boolean)),
                ("isUploadingTo", ro(Boolean)),
                ("isUTP", ro(Boolean)),
                ("peerIsChoked", ro(Boolean)),
                ("peerIsInterested", ro(Boolean)),
                ("port", ro(Int)),
                ("progress", ro(Percent)),
                ("rateToClient", ro(BytesRate)),
                ("rateToPeer", ro(BytesRate)),
            ])),
        ),
        ("peersConnected", ro(Int)),
        (
            "peersFrom",
            FieldSpec::record([
                ("fromCache", ro(Int)),
                ("fromDht", ro(Int)),
                ("fromIncoming", ro(Int)),
                ("fromLpd", ro(Int)),
                ("fromLtep", ro(Int)),
                ("fromPex", ro(Int)),
                ("fromTracker", ro(Int)),
            ]),
        ),
        ("peersGettingFromUs", ro(Int)),
        ("peersSendingToUs", ro(Int)),
        ("percentDone", ro(Percent)),
        ("pieces", ro(Str)),
        ("pieceCount", ro(Int)),
        ("pieceSize", ro(BytesSize)),
        ("priorities", FieldSpec::list(ro(Int))),
        ("queuePosition", rw(Int)),
        ("rateDownload", ro(BytesRate)),
        ("rateUpload", ro(BytesRate)),
        ("recheckProgress", ro(Percent)),
        ("secondsDownloading", ro(Timespan)),
        ("secondsSeeding", ro(Timespan)),
        ("seedIdleLimit", rw(Timespan)),
        ("seedIdleMode", rw(Int)),
        ("seedRatioLimit", rw(Ratio)),
        ("seedRatioMode", rw(Int)),
        ("sizeWhenDone", ro(BytesSize)),
        ("startDate", ro(Date)),
        ("status", ScalarSpec::new(Int, false).on_update(torrent_status).into()),
        (
            "trackers",
            FieldSpec::list(FieldSpec::record([
                ("announce", ro(Str)),
                ("id", ro(Int)),
                ("scrape", ro(Str)),
                ("tier", ro(Int)),
            ])),
        ),
        (
            "trackerStats",
            FieldSpec::list(FieldSpec::record([
                ("announce", ro(Str)),
                ("announceState", ro(Int)),
                ("downloadCount", ro(Int)),
                ("hasAnnounced", ro(Boolean)),
                ("hasScraped", ro(Boolean)),
                ("host", ro(Str)),
                ("id", ro(Int)),
                ("isBackup", ro(Boolean)),
                ("lastAnnouncePeerCount", ro(Int)),
                ("lastAnnounceResult", ro(Str)),
                ("lastAnnounceStartTime", ro(Int)),
                ("lastAnnounceSucceeded", ro(Boolean)),
                ("lastAnnounceTime", ro(Int)),
                ("lastAnnounceTimedOut", ro(Boolean)),
                ("lastScrapeResult", ro(Str)),
                ("lastScrapeStartTime", ro(Int)),
                ("lastScrapeSucceeded", ro(Boolean)),
                ("lastScrapeTime", ro(Int)),
                ("lastScrapeTimedOut", ro(Boolean)),
                ("leecherCount", ro(Int)),
                ("nextAnnounceTime", ro(Int)),
                ("nextScrapeTime", ro(Int)),
                ("scrape", ro(Str)),
                ("scrapeState", ro(Int)),
                ("seederCount", ro(Int)),
                ("tier", ro(Int)),
            ])),
        ),
        ("totalSize", ro(BytesSize)),
        ("torrentFile", ro(Str)),
        ("uploadedEver", ro(BytesSize)),
        ("uploadLimit", kilo_rate()),
        ("uploadLimited", rw(Boolean)),
        ("uploadRatio", ro(Ratio)),
        ("wanted", FieldSpec::list(ro(Boolean))),
    ])
}

/// The shared daemon schema, built on first use.
pub fn schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Arc::new(
                Schema::new()
                    .with_section(SESSION, session())
                    .with_section(TORRENT, torrent())
                    .with_identifier(TORRENT, TORRENT_ID),
            )
        })
        .clone()
}
