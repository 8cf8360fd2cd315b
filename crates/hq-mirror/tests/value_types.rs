use std::sync::Arc;

use hq_format::{FormatConfig, TypeTag};
use hq_mirror::{Error, Hook, Leaf, ScalarSpec};
use serde_json::{json, Value};

fn rpc_types() -> Vec<(TypeTag, Value, &'static str)> {
    vec![
        (TypeTag::Float, json!(1.2345), "1.2345"),
        (TypeTag::Ratio, json!(1.2345), "1.23"),
        (TypeTag::Int, json!(1), "1"),
        (TypeTag::Str, json!("Hello"), "Hello"),
        (TypeTag::Percent, json!(0.55432), "55 %"),
        (TypeTag::Boolean, json!(true), "true"),
        (TypeTag::PathDir, json!("/home/tester/test"), "~/test/"),
        (TypeTag::PathFile, json!("/home/tester/test"), "~/test"),
        (TypeTag::Url, json!("http://some/link"), "http://some/link"),
        (TypeTag::BytesSize, json!(1073741824), "1.00 GiB"),
        (TypeTag::BytesRate, json!(1073741824), "1.00 GiB/s"),
        (TypeTag::Date, json!(1000000000), "2001-09-09 01:46:40"),
        (TypeTag::Timespan, json!(300), "5m"),
    ]
}

fn format() -> Arc<FormatConfig> {
    Arc::new(FormatConfig::default().with_home_dir("/home/tester"))
}

fn leaf(tag: TypeTag, raw: &Value, mutable: bool) -> Leaf {
    Leaf::new("TEST", raw, &ScalarSpec::new(tag, mutable), format())
}

#[test]
fn construct_with_value() {
    for (tag, value, pretty) in rpc_types() {
        let l = leaf(tag, &value, true);
        assert_eq!(l.value(), &value, "{tag}");
        assert_eq!(l.human(), pretty, "{tag}");
    }
}

#[test]
fn local_change() {
    for (tag, value, pretty) in rpc_types() {
        let mut l = leaf(tag, &Value::Null, true);
        l.set(value.clone()).unwrap();
        assert_eq!(l.value(), &value, "{tag}");
        assert_eq!(l.human(), pretty, "{tag}");
        assert!(l.is_dirty(), "{tag}");
    }
}

#[test]
fn daemon_change() {
    for (tag, value, pretty) in rpc_types() {
        let mut l = leaf(tag, &Value::Null, true);
        l.absorb_remote(&value);
        assert_eq!(l.value(), &value, "{tag}");
        assert_eq!(l.human(), pretty, "{tag}");
        assert!(!l.is_dirty(), "{tag}");
    }
}

#[test]
fn immutable_refuses_set() {
    for (tag, value, _) in rpc_types() {
        let mut l = leaf(tag, &Value::Null, false);
        assert_eq!(l.set(value), Err(Error::Immutable { path: "TEST".into() }), "{tag}");
        assert_eq!(l.value(), &Value::Null, "{tag}");
    }
}

#[test]
fn installed_hooks_override_defaults() {
    for (tag, value, _) in rpc_types() {
        let mut l = leaf(tag, &json!(0), true);
        l.install_hook(Hook::on_update(|_| Value::Null));
        l.install_hook(Hook::prettify(|_| "Snow White".to_string()));
        l.absorb_remote(&value);
        assert_eq!(l.value(), &Value::Null, "{tag}");
        assert_eq!(l.human(), "Snow White", "{tag}");
    }
}

#[test]
fn write_hook_only_shapes_outgoing_value() {
    let spec = ScalarSpec::new(TypeTag::BytesRate, true)
        .on_update(|v| json!(v.as_i64().unwrap_or(0) * 1000))
        .on_write(|v| json!(v.as_i64().unwrap_or(0) / 1000));
    let mut l = Leaf::new("speed-limit-up", &json!(100), &spec, format());
    l.set(50_000).unwrap();
    assert_eq!(l.value(), &json!(50_000));
    assert_eq!(l.outgoing(), json!(50));
    assert_eq!(l.apply_on_update(&json!(2)), json!(2000));
}

#[test]
fn decimal_base_config() {
    let decimal = Arc::new(
        FormatConfig::from_toml_str("byte_base = \"decimal\"\nhome_dir = \"/srv\"").unwrap(),
    );
    let spec = ScalarSpec::new(TypeTag::BytesSize, false);
    assert_eq!(Leaf::new("x", &json!(123), &spec, decimal.clone()).human(), "123 B");
    assert_eq!(Leaf::new("x", &json!(1000), &spec, decimal.clone()).human(), "1.00 kB");
    let dir = ScalarSpec::new(TypeTag::PathDir, false);
    assert_eq!(Leaf::new("x", &json!("/srv/media"), &dir, decimal).human(), "~/media/");
}
