//! Binding nested structs from environment variables.
#![expect(clippy::expect_used, reason = "tests panic to surface configuration mistakes")]

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Result, anyhow, ensure};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use confbind::{Bind, BindError, MapEnv, bind_from_env, bind_from_env_source};
use rstest::{fixture, rstest};
use serial_test::serial;

#[derive(Bind, Debug, Default, Clone, PartialEq, Eq)]
struct Simple {
    pub text: String,
    pub number: i32,
    pub flag_on: bool,
    pub flag_off: bool,
}

#[derive(Bind, Debug, Default)]
struct WithDefaults {
    #[config("default:foobar")]
    pub text: String,
    #[config("default:42")]
    pub number: i32,
    #[config("default:true")]
    pub flag_on: bool,
    #[config("default:false")]
    pub flag_off: bool,
}

#[derive(Bind, Debug, Default)]
struct Nested {
    pub outer: String,
    pub inner: Simple,
}

#[derive(Bind, Debug, Default)]
struct Renamed {
    #[config("env:str")]
    pub text: String,
    #[config("env:count")]
    pub number: i32,
    #[config("env:sub")]
    pub inner: Simple,
}

#[derive(Bind, Debug, Default)]
struct Lists {
    pub empty: Vec<i64>,
    pub words: Vec<String>,
    pub records: Vec<Simple>,
    pub untouched: Option<Vec<String>>,
}

#[derive(Bind, Debug, Default)]
struct Fixed {
    pub words: [String; 3],
}

#[derive(Bind, Debug, Default)]
struct Times {
    pub value: chrono::DateTime<chrono::FixedOffset>,
    #[config("default:2020-02-17 09:06:21")]
    pub local: chrono::DateTime<chrono::FixedOffset>,
    #[config("default:2020-02-17")]
    pub day: chrono::DateTime<chrono::FixedOffset>,
    #[config("default:2020-02-17T09:06:21Z")]
    pub utc: chrono::DateTime<chrono::FixedOffset>,
    #[config("default:2020-02-17 07:06:21+0100")]
    pub short_zone: chrono::DateTime<chrono::FixedOffset>,
    #[config("default:2020-02-17 09:06:21+01:00")]
    pub zone: chrono::DateTime<chrono::FixedOffset>,
    #[config("default:1h30m")]
    pub timeout: Duration,
}

#[derive(Bind, Debug, Default)]
struct Visibility {
    pub public: String,
    hidden: String,
}

#[derive(Bind, Debug, Default)]
struct Pointers {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub inner: Option<Box<Simple>>,
}

#[derive(Bind, Debug, Default)]
struct Broken {
    #[config("env")]
    pub value: String,
}

#[fixture]
fn simple_env() -> MapEnv {
    MapEnv::new()
        .with("TEST_TEXT", "foobar")
        .with("TEST_NUMBER", "42")
        .with("TEST_FLAG_ON", "true")
        .with("TEST_FLAG_OFF", "false")
}

fn parse_local(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").expect("fixture timestamp")
}

#[rstest]
fn empty_environment_leaves_defaults() -> Result<()> {
    let mut conf = Simple::default();
    bind_from_env_source("test", &mut conf, &MapEnv::new())?;
    ensure!(conf == Simple::default());
    Ok(())
}

#[rstest]
fn binds_flat_fields(simple_env: MapEnv) -> Result<()> {
    let mut conf = Simple::default();
    bind_from_env_source("test", &mut conf, &simple_env)?;
    ensure!(conf.text == "foobar");
    ensure!(conf.number == 42);
    ensure!(conf.flag_on);
    ensure!(!conf.flag_off);
    Ok(())
}

#[rstest]
#[case::integer("TEST_NUMBER", "not numeric", "test.number")]
#[case::boolean("TEST_FLAG_ON", "not a bool", "test.flag_on")]
fn rejects_unparseable_values(
    #[case] key: &str,
    #[case] value: &str,
    #[case] path: &str,
) -> Result<()> {
    let env = MapEnv::new().with(key, value);
    let mut conf = Simple::default();
    let err = bind_from_env_source("test", &mut conf, &env)
        .expect_err("malformed value should fail");
    match err {
        BindError::ValueParse { path: failed, .. } => ensure!(failed == path),
        other => return Err(anyhow!("unexpected error: {other}")),
    }
    Ok(())
}

#[rstest]
fn applies_defaults_when_unset() -> Result<()> {
    let mut conf = WithDefaults::default();
    bind_from_env_source("test", &mut conf, &MapEnv::new())?;
    ensure!(conf.text == "foobar");
    ensure!(conf.number == 42);
    ensure!(conf.flag_on);
    ensure!(!conf.flag_off);
    Ok(())
}

#[rstest]
fn explicit_values_beat_defaults() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_TEXT", "NEW STR")
        .with("TEST_NUMBER", "1337")
        .with("TEST_FLAG_ON", "false")
        .with("TEST_FLAG_OFF", "true");
    let mut conf = WithDefaults::default();
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.text == "NEW STR");
    ensure!(conf.number == 1337);
    ensure!(!conf.flag_on);
    ensure!(conf.flag_off);
    Ok(())
}

#[rstest]
fn binds_nested_records() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_OUTER", "test")
        .with("TEST_INNER_TEXT", "foobar")
        .with("TEST_INNER_NUMBER", "42")
        .with("TEST_INNER_FLAG_ON", "yes");
    let mut conf = Nested::default();
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.outer == "test");
    ensure!(
        conf.inner
            == Simple {
                text: "foobar".to_owned(),
                number: 42,
                flag_on: true,
                flag_off: false,
            }
    );
    Ok(())
}

#[rstest]
fn env_names_replace_key_segments() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_STR", "test str")
        .with("TEST_COUNT", "1337")
        .with("TEST_SUB_TEXT", "foobar")
        .with("TEST_SUB_NUMBER", "42");
    let mut conf = Renamed::default();
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.text == "test str");
    ensure!(conf.number == 1337);
    ensure!(conf.inner.text == "foobar");
    ensure!(conf.inner.number == 42);
    Ok(())
}

#[rstest]
fn empty_prefix_binds_unprefixed_keys() -> Result<()> {
    let env = MapEnv::new().with("TEXT", "bare").with("NUMBER", "7");
    let mut conf = Simple::default();
    bind_from_env_source("", &mut conf, &env)?;
    ensure!(conf.text == "bare");
    ensure!(conf.number == 7);
    Ok(())
}

#[rstest]
fn lists_follow_their_count_variable() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_EMPTY_NUM", "0")
        .with("TEST_WORDS_NUM", "3")
        .with("TEST_WORDS_0", "foo")
        .with("TEST_WORDS_1", "bar")
        .with("TEST_WORDS_2", "42")
        .with("TEST_WORDS_3", "ignored")
        .with("TEST_RECORDS_NUM", "1")
        .with("TEST_RECORDS_0_TEXT", "foobar")
        .with("TEST_RECORDS_0_NUMBER", "42")
        .with("TEST_RECORDS_0_FLAG_ON", "true")
        .with("TEST_UNTOUCHED_0", "no count, no list");
    let mut conf = Lists {
        empty: vec![1, 2],
        ..Lists::default()
    };
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.empty.is_empty());
    ensure!(conf.words == ["foo", "bar", "42"]);
    ensure!(
        conf.records
            == [Simple {
                text: "foobar".to_owned(),
                number: 42,
                flag_on: true,
                flag_off: false,
            }]
    );
    ensure!(conf.untouched.is_none());
    Ok(())
}

#[rstest]
fn list_without_count_keeps_existing_elements() -> Result<()> {
    let env = MapEnv::new().with("TEST_WORDS_0", "replacement");
    let mut conf = Lists {
        words: vec!["kept".to_owned()],
        ..Lists::default()
    };
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.words == ["kept"]);
    Ok(())
}

#[rstest]
fn zero_count_allocates_optional_list() -> Result<()> {
    let env = MapEnv::new().with("TEST_UNTOUCHED_NUM", "0");
    let mut conf = Lists::default();
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.untouched == Some(Vec::new()));
    Ok(())
}

#[rstest]
fn malformed_count_is_an_error() {
    let env = MapEnv::new().with("TEST_WORDS_NUM", "many");
    let mut conf = Lists::default();
    let err = bind_from_env_source("test", &mut conf, &env).expect_err("count should be rejected");
    assert_eq!(
        err.to_string(),
        "test.words: cannot parse list length from \"many\": failed to parse list length"
    );
}

#[rstest]
#[case::max("18446744073709551615")]
#[case::past_isize("9223372036854775808")]
fn unallocatable_count_is_an_error(#[case] count: &str) {
    let env = MapEnv::new()
        .with("TEST_WORDS_NUM", count)
        .with("TEST_WORDS_0", "foo");
    let mut conf = Lists {
        words: vec!["kept".to_owned()],
        ..Lists::default()
    };
    let err = bind_from_env_source("test", &mut conf, &env).expect_err("count cannot be allocated");
    assert_eq!(
        err.to_string(),
        format!("test.words: cannot parse list length from \"{count}\": list length too large")
    );
    assert_eq!(conf.words, ["kept"]);
}

#[rstest]
fn arrays_read_every_position() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_WORDS_0", "foo")
        .with("TEST_WORDS_1", "bar")
        .with("TEST_WORDS_2", "42");
    let mut conf = Fixed::default();
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.words == ["foo", "bar", "42"]);
    Ok(())
}

#[rstest]
fn binds_timestamps_and_durations() -> Result<()> {
    let env = MapEnv::new().with("TEST_VALUE", "2020-02-17T09:08:42");
    let mut conf = Times::default();
    bind_from_env_source("test", &mut conf, &env)?;

    ensure!(conf.value.naive_local() == parse_local("2020-02-17 09:08:42"));
    ensure!(conf.local.naive_local() == parse_local("2020-02-17 09:06:21"));
    let midnight = NaiveDate::from_ymd_opt(2020, 2, 17)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("invalid fixture date"))?;
    ensure!(conf.day.naive_local() == midnight);
    ensure!(conf.utc == Utc.with_ymd_and_hms(2020, 2, 17, 9, 6, 21).single().ok_or_else(|| anyhow!("fixture"))?);

    ensure!(conf.short_zone.naive_local() == parse_local("2020-02-17 07:06:21"));
    ensure!(conf.short_zone.naive_utc() == parse_local("2020-02-17 06:06:21"));
    ensure!(conf.zone.naive_local() == parse_local("2020-02-17 09:06:21"));
    ensure!(conf.zone.naive_utc() == parse_local("2020-02-17 08:06:21"));

    ensure!(conf.timeout == Duration::from_secs(90 * 60));
    Ok(())
}

#[rstest]
fn private_fields_are_never_written() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_PUBLIC", "foobar")
        .with("TEST_HIDDEN", "should not be used");
    let mut conf = Visibility {
        public: String::new(),
        hidden: "keep it".to_owned(),
    };
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.public == "foobar");
    ensure!(conf.hidden == "keep it");
    Ok(())
}

#[rstest]
fn optional_values_are_allocated_on_write() -> Result<()> {
    let env = MapEnv::new()
        .with("TEST_PORT", "8080")
        .with("TEST_INNER_NUMBER", "5");
    let mut conf = Pointers::default();
    bind_from_env_source("test", &mut conf, &env)?;
    ensure!(conf.port == Some(8080));
    ensure!(conf.host.is_none());
    let inner = conf.inner.ok_or_else(|| anyhow!("inner should be allocated"))?;
    ensure!(inner.number == 5);
    ensure!(inner.text.is_empty());
    Ok(())
}

#[rstest]
fn narrowing_overflow_is_reported() {
    let env = MapEnv::new().with("TEST_PORT", "70000");
    let mut conf = Pointers::default();
    let err = bind_from_env_source("test", &mut conf, &env).expect_err("port should overflow");
    assert!(err.to_string().starts_with("test.port: cannot parse u16 from \"70000\""));
    assert!(conf.port.is_none());
}

#[rstest]
fn shared_root_is_not_assignable() {
    let mut shared = Rc::new(Simple::default());
    let err = bind_from_env_source("test", &mut shared, &MapEnv::new())
        .expect_err("shared handles cannot be written");
    assert!(matches!(err, BindError::NotAssignable { ref path } if path == "test"));
}

#[rstest]
#[should_panic(expected = "invalid config annotation")]
fn malformed_annotation_panics() {
    let mut conf = Broken::default();
    let _ = bind_from_env_source("test", &mut conf, &MapEnv::new());
}

#[rstest]
fn closures_serve_as_environment() -> Result<()> {
    let lookup = |key: &str| (key == "APP_NUMBER").then(|| "9".to_owned());
    let mut conf = Simple::default();
    bind_from_env_source("app", &mut conf, &lookup)?;
    ensure!(conf.number == 9);
    Ok(())
}

#[rstest]
#[serial]
fn reads_the_process_environment() -> Result<()> {
    let _guard = test_helpers::env::scope([
        ("CONFBIND_IT_TEXT", "from process"),
        ("CONFBIND_IT_NUMBER", "11"),
    ]);
    let mut conf = Simple::default();
    bind_from_env("confbind_it", &mut conf)?;
    ensure!(conf.text == "from process");
    ensure!(conf.number == 11);
    Ok(())
}
