use std::cell::RefCell;

use serde_json::json;

use wsdl2rs::runtime::{self, Call, CallError, IntoArgument, Transport, Value};
use wsdl2rs::{generate_from_str, strategy_for, GeneratorConfig, Layout};

#[path = "fixtures/catalog.rs"]
mod catalog;

use catalog::{Base, Catalog, Derived};

const CATALOG: &str = include_str!("fixtures/catalog.json");
const CATALOG_RS: &str = include_str!("fixtures/catalog.rs");

#[test]
fn single_file_output_matches_committed_fixture() {
    let config = GeneratorConfig::default();
    let output = generate_from_str(CATALOG, &config).unwrap();
    let files = strategy_for(Layout::Single).package(&output, &config);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].contents, CATALOG_RS);
}

#[test]
fn derived_class_extends_base_without_redeclaring_fields() {
    let output = generate_from_str(CATALOG, &GeneratorConfig::default()).unwrap();

    let derived = &output.class("Derived").unwrap().source;
    assert!(derived.contains("#[serde(flatten)]\n    pub base: Base,"));
    assert!(derived.contains("pub LABELX: Option<String>,"));
    assert!(!derived.contains("pub MYVALUE"));
    assert!(derived.contains("(\"MY-VALUE\", \"MYVALUE\"),"));
}

#[test]
fn expanded_methods_take_typed_parameters() {
    let config = GeneratorConfig {
        expand_arguments: true,
        ..GeneratorConfig::default()
    };
    let output = generate_from_str(CATALOG, &config).unwrap();
    let service = &output.service("Catalog").unwrap().source;
    assert!(service.contains("pub fn Find(&self, query: String) -> Result<Value, CallError> {"));
    assert!(service.contains("pub fn Store(&self, item: Base) -> Result<Value, CallError> {"));
    assert!(service.contains("pub fn new_(&self) -> Result<Value, CallError> {"));
}

#[derive(Default)]
struct RecordingTransport {
    calls: RefCell<Vec<(String, String)>>,
}

impl Transport for RecordingTransport {
    fn call(&self, call: Call<'_>) -> Result<Value, CallError> {
        assert_eq!(call.classmap, Catalog::<Self>::CLASSMAP);
        let signature = runtime::signature_of(&call.arguments);
        self.calls
            .borrow_mut()
            .push((call.operation.to_string(), signature));
        Ok(Value::from(call.arguments.len() as i64))
    }
}

#[test]
fn dispatch_accepts_declared_shapes_only() {
    let service = Catalog::new(RecordingTransport::default());
    assert_eq!(
        Catalog::<RecordingTransport>::LOCATION,
        "http://example.test/catalog"
    );

    assert_eq!(service.Find(vec![Value::from("abc")]).unwrap(), Value::from(1i64));
    assert_eq!(
        service.Find(vec![Value::from(2), Value::from("abc")]).unwrap(),
        Value::from(2i64)
    );

    let err = service.Find(vec![Value::from(2), Value::from(3)]).unwrap_err();
    assert!(matches!(err, CallError::InvalidArgumentShape(ref s) if s == "(integer)(integer)"));

    let item = Base { MYVALUE: Some(9) };
    service.Store(vec![item.into_argument().unwrap()]).unwrap();

    let err = service.Store(vec![Value::from("abc")]).unwrap_err();
    assert!(matches!(err, CallError::InvalidArgumentShape(_)));

    service.new_(Vec::new()).unwrap();
    service.new_2(Vec::new()).unwrap();
    assert!(service.new_2(vec![Value::from(1)]).is_err());

    let calls = service.transport().calls.borrow();
    assert_eq!(
        *calls,
        [
            ("Find".to_string(), "(string)".to_string()),
            ("Find".to_string(), "(integer)(string)".to_string()),
            ("Store".to_string(), "(Base)".to_string()),
            ("new".to_string(), String::new()),
            ("new_".to_string(), String::new()),
        ]
    );
}

#[test]
fn subclass_values_report_their_own_class() {
    let derived = Derived {
        base: Base { MYVALUE: Some(1) },
        LABELX: Some("x".to_string()),
        tags: Some(vec!["a".to_string()]),
    };
    assert_eq!(derived.MYVALUE, Some(1));

    let value = derived.clone().into_argument().unwrap();
    assert_eq!(value.category(), "Derived");
    assert_eq!(
        value.clone().into_json(),
        json!({"MY-VALUE": 1, "LABEL-X": "x", "tags": ["a"]})
    );

    let decoded: Derived = value.decode().unwrap();
    assert_eq!(decoded, derived);
}

#[test]
fn aliased_property_round_trips_through_both_names() {
    let mut item = Base::default();
    assert_eq!(item.get_property("MY-VALUE"), None);

    item.set_property("MYVALUE", json!(42)).unwrap();
    assert_eq!(item.get_property("MY-VALUE"), Some(json!(42)));
    assert_eq!(item.get_property("MYVALUE"), Some(json!(42)));

    item.set_property("MY-VALUE", json!(7)).unwrap();
    assert_eq!(item.MYVALUE, Some(7));

    let err = item.set_property("missing", json!(1)).unwrap_err();
    assert!(err.to_string().contains("unknown property: missing"));
}

#[test]
fn subclass_reaches_inherited_aliases() {
    let mut item = Derived::default();

    item.set_property("MYVALUE", json!(42)).unwrap();
    assert_eq!(item.get_property("MY-VALUE"), Some(json!(42)));
    assert_eq!(item.MYVALUE, Some(42));

    item.set_property("LABEL-X", json!("y")).unwrap();
    assert_eq!(item.get_property("LABELX"), Some(json!("y")));
    assert_eq!(item.LABELX.as_deref(), Some("y"));

    item.set_property("tags", json!(["t"])).unwrap();
    assert_eq!(item.tags, Some(vec!["t".to_string()]));
}
