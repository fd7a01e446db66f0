//! Rendering populated structs as aligned `key: value` lines.
#![expect(clippy::expect_used, reason = "tests panic to surface configuration mistakes")]

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Result, anyhow, ensure};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use confbind::{Bind, BindError, NamedValue, render_to_list, render_to_string, try_render_to_list};
use rstest::{fixture, rstest};

#[derive(Bind, Debug, Clone, Default)]
struct Simple {
    pub text: String,
    pub number: i32,
    pub flag: bool,
}

#[fixture]
fn simple() -> Simple {
    Simple {
        text: "foobar".to_owned(),
        number: 42,
        flag: true,
    }
}

#[derive(Bind)]
struct Visibility {
    pub public: String,
    hidden: String,
}

#[derive(Bind, Default)]
struct Pointers {
    pub value: Option<Box<i32>>,
    pub shared: Option<Rc<i32>>,
}

#[derive(Bind)]
struct Nested {
    pub foo: Simple,
    pub bar: Simple,
}

#[derive(Bind)]
struct Annotated {
    #[config("print:default-val")]
    pub renamed: String,
    #[config("print:-")]
    pub secret: String,
    #[config("print:none")]
    pub nested_secret: Simple,
}

#[derive(Bind)]
struct Sequences {
    pub list: Vec<String>,
    pub pair: [String; 2],
}

#[derive(Bind)]
struct NonZero {
    #[config("print:[nonzero]")]
    pub text: String,
    #[config("print:[nonzero]")]
    pub text_zero: String,
    #[config("print:[nonzero]")]
    pub number: i32,
    #[config("print:[nonzero]")]
    pub number_zero: i32,
}

#[derive(Bind)]
struct Lengths {
    #[config("print:[len]")]
    pub text: String,
    #[config("print:[len]")]
    pub list: Vec<i32>,
    #[config("print:[len]")]
    pub array: [i32; 5],
    #[config("print:[len]")]
    pub absent: Option<Vec<i32>>,
}

#[derive(Bind)]
struct Masked {
    #[config("print:[mask]")]
    pub text_zero: String,
    #[config("print:[mask]")]
    pub text: String,
    #[config("print:[mask]")]
    pub number_zero: i32,
    #[config("print:[mask]")]
    pub number: i32,
}

#[derive(Bind)]
struct Inherited {
    #[config("print:creds:[mask]")]
    pub credentials: Simple,
    #[config("print:[nonzero]")]
    pub partial: Simple,
}

#[derive(Bind)]
struct Times {
    pub time: DateTime<FixedOffset>,
    pub duration: Duration,
}

#[derive(Bind, Default)]
struct Hashed {
    #[config("print:[sha256]")]
    pub token: String,
}

#[derive(Bind, Default)]
struct BadLength {
    #[config("print:[len]")]
    pub port: u16,
}

#[rstest]
fn renders_flat_record(simple: Simple) {
    assert_eq!(
        render_to_string("Stuff", &simple),
        "Stuff.text:   foobar\nStuff.number: 42\nStuff.flag:   true"
    );
}

#[rstest]
fn renders_through_boxes(simple: Simple) {
    let boxed = Box::new(simple);
    assert_eq!(
        render_to_string("Stuff", &boxed),
        "Stuff.text:   foobar\nStuff.number: 42\nStuff.flag:   true"
    );
}

#[rstest]
fn skips_private_fields() {
    let conf = Visibility {
        public: "foobar".to_owned(),
        hidden: "unexported".to_owned(),
    };
    assert_eq!(render_to_string("Stuff", &conf), "Stuff.public: foobar");
    assert_eq!(conf.hidden, "unexported");
}

#[rstest]
fn follows_present_pointers() {
    let conf = Pointers {
        value: Some(Box::new(42)),
        shared: Some(Rc::new(7)),
    };
    assert_eq!(
        render_to_string("Stuff", &conf),
        "Stuff.value:  42\nStuff.shared: 7"
    );
}

#[rstest]
fn absent_pointers_render_nothing() {
    assert_eq!(render_to_string("Stuff", &Pointers::default()), "");
    assert!(render_to_list("Stuff", &Pointers::default()).is_empty());
}

#[rstest]
fn renders_nested_records() {
    let conf = Nested {
        foo: Simple {
            text: "foo".to_owned(),
            number: 42,
            flag: true,
        },
        bar: Simple {
            text: "bar".to_owned(),
            number: 1337,
            flag: false,
        },
    };
    assert_eq!(
        render_to_string("Pre", &conf),
        concat!(
            "Pre.foo.text:   foo\n",
            "Pre.foo.number: 42\n",
            "Pre.foo.flag:   true\n",
            "Pre.bar.text:   bar\n",
            "Pre.bar.number: 1337\n",
            "Pre.bar.flag:   false",
        )
    );
}

#[rstest]
fn annotations_rename_and_suppress(simple: Simple) {
    let conf = Annotated {
        renamed: "foobar".to_owned(),
        secret: "super-secret-password".to_owned(),
        nested_secret: simple,
    };
    assert_eq!(render_to_string("Stuff", &conf), "Stuff.default-val: foobar");
}

#[rstest]
fn indexes_sequences() {
    let conf = Sequences {
        list: vec!["foo".to_owned(), "bar".to_owned()],
        pair: ["baz".to_owned(), "qux".to_owned()],
    };
    assert_eq!(
        render_to_string("Stuff", &conf),
        "Stuff.list[0]: foo\nStuff.list[1]: bar\nStuff.pair[0]: baz\nStuff.pair[1]: qux"
    );
}

#[rstest]
fn nonzero_hides_zero_values() {
    let conf = NonZero {
        text: "foobar".to_owned(),
        text_zero: String::new(),
        number: 42,
        number_zero: 0,
    };
    assert_eq!(
        render_to_string("Stuff", &conf),
        "Stuff.text:   foobar\nStuff.number: 42"
    );
}

#[rstest]
fn len_renders_counts() {
    let conf = Lengths {
        text: "foobar".to_owned(),
        list: vec![42, 1337],
        array: [1, 2, 3, 4, 5],
        absent: None,
    };
    assert_eq!(
        render_to_string("Stuff", &conf),
        "Stuff.text:  6\nStuff.list:  2\nStuff.array: 5"
    );
}

#[rstest]
fn mask_hides_non_zero_values() {
    let conf = Masked {
        text_zero: String::new(),
        text: "some test string".to_owned(),
        number_zero: 0,
        number: 42,
    };
    assert_eq!(
        render_to_string("Stuff", &conf),
        "Stuff.text:   ******\nStuff.number: ******"
    );
}

#[rstest]
fn modes_apply_to_nested_values(simple: Simple) {
    let conf = Inherited {
        credentials: simple,
        partial: Simple {
            text: String::new(),
            number: 3,
            flag: false,
        },
    };
    let expected = [
        ("Stuff.creds.text", "******"),
        ("Stuff.creds.number", "******"),
        ("Stuff.creds.flag", "******"),
        ("Stuff.partial.number", "3"),
    ]
    .map(|(key, value)| NamedValue {
        key: key.to_owned(),
        value: value.to_owned(),
    });
    assert_eq!(render_to_list("Stuff", &conf), expected);
}

#[rstest]
fn renders_timestamps_and_durations() -> Result<()> {
    let time = Utc
        .with_ymd_and_hms(2020, 5, 5, 13, 49, 44)
        .single()
        .ok_or_else(|| anyhow!("invalid fixture timestamp"))?
        .fixed_offset();
    let conf = Times {
        time,
        duration: Duration::from_secs(2 * 3600 + 15 * 60),
    };
    let rendered = render_to_string("Stuff", &conf);
    ensure!(
        rendered == "Stuff.time:     2020-05-05 13:49:44+00:00\nStuff.duration: 2h 15m",
        "unexpected rendering: {rendered}"
    );
    Ok(())
}

#[rstest]
fn list_form_serialises_to_json(simple: Simple) -> Result<()> {
    let entries = try_render_to_list("app", &simple)?;
    let encoded = serde_json::to_value(&entries)?;
    ensure!(encoded.get(0) == Some(&serde_json::json!({"key": "app.text", "value": "foobar"})));
    ensure!(entries.len() == 3);
    Ok(())
}

#[rstest]
fn sha256_mode_is_unsupported() {
    let conf = Hashed {
        token: "abc".to_owned(),
    };
    let err = try_render_to_list("Stuff", &conf).expect_err("sha256 is not implemented");
    assert!(matches!(err, BindError::Unsupported { ref path, .. } if path == "Stuff.token"));
    assert_eq!(err.to_string(), "Stuff.token: sha256 display mode is not supported");
}

#[rstest]
fn len_on_scalar_is_unsupported() {
    let err = try_render_to_list("Stuff", &BadLength::default()).expect_err("ports have no length");
    assert!(matches!(err, BindError::Unsupported { .. }));
}

#[rstest]
#[should_panic(expected = "cannot render configuration")]
fn infallible_rendering_panics_on_unsupported_modes() {
    let _ = render_to_list("Stuff", &Hashed::default());
}
