use billing_core::{
    encode_body, Amount, JsonFormat, Model, ModelErrorKind, OpenEnum, PropertySpec, PropertyStore,
    ResponseFormat, StringEnum, ValidatedJsonFormat,
};
use bytes::Bytes;
use serde_json::json;
use strum::{EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Status {
    Active,
    Archived,
}

impl StringEnum for Status {
    const ENUM_NAME: &'static str = "Status";
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Account {
    store: PropertyStore,
}

impl Account {
    fn name(&self) -> Result<String, billing_core::ModelError> {
        self.store.required("name")
    }

    fn status(&self) -> Result<OpenEnum<Status>, billing_core::ModelError> {
        self.store.required("status")
    }

    fn email(&self) -> Result<Option<String>, billing_core::ModelError> {
        self.store.nullable("email")
    }

    fn portal_url(&self) -> Result<Option<String>, billing_core::ModelError> {
        self.store.optional("portal_url")
    }

    fn set_name(&mut self, name: &str) {
        self.store.put("name", &name.to_string());
    }
}

impl Model for Account {
    const NAME: &'static str = "Account";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("name"),
        PropertySpec::required::<OpenEnum<Status>>("status"),
        PropertySpec::nullable::<String>("email"),
        PropertySpec::null_when_absent::<String>("portal_url"),
        PropertySpec::optional::<Amount>("balance"),
    ];

    fn from_raw_unchecked(store: PropertyStore) -> Self {
        Self { store }
    }
    fn store(&self) -> &PropertyStore {
        &self.store
    }
    fn store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }
    fn into_store(self) -> PropertyStore {
        self.store
    }
}

#[test]
fn test_bytes_round_trip_preserves_everything() {
    let body = Bytes::from(
        r#"{"name":"Acme","status":"active","email":null,"balance":"19.99","future":{"a":[1,2]}}"#,
    );
    let account = ValidatedJsonFormat::<Account>::parse(body.clone()).unwrap();
    assert_eq!(account.status().unwrap(), Status::Active);

    let encoded = encode_body(&account).unwrap();
    assert_eq!(encoded, body);
}

#[test]
fn test_setter_overwrites_in_place() {
    let mut account = JsonFormat::<Account>::parse(Bytes::from(
        r#"{"name":"Acme","status":"archived","email":"a@b.c"}"#,
    ))
    .unwrap();
    account.set_name("Globex");

    let names: Vec<_> = account.store().names().collect();
    assert_eq!(names, vec!["name", "status", "email"]);
    assert_eq!(account.name().unwrap(), "Globex");
}

#[test]
fn test_null_versus_absent() {
    let absent = Account::from_json(json!({"name": "Acme", "status": "active"})).unwrap();
    assert!(absent.email().unwrap_err().is_missing_property());
    assert_eq!(absent.portal_url().unwrap(), None);
    assert_eq!(absent.validate().unwrap_err().path(), "email");

    let null = Account::from_json(json!({
        "name": "Acme",
        "status": "active",
        "email": null,
        "portal_url": null
    }))
    .unwrap();
    assert_eq!(null.email().unwrap(), None);
    assert_eq!(null.portal_url().unwrap(), None);
    assert!(null.validate().is_ok());
}

#[test]
fn test_unknown_enum_surfaces_only_on_validate() {
    let account = Account::from_json(json!({
        "name": "Acme",
        "status": "suspended",
        "email": null
    }))
    .unwrap();

    let status = account.status().unwrap();
    assert!(!status.is_known());

    let err = account.validate().unwrap_err();
    assert_eq!(err.kind(), ModelErrorKind::InvalidEnumValue);
    assert_eq!(err.path(), "status");
    assert_eq!(account.to_json()["status"], json!("suspended"));
}

#[test]
fn test_malformed_amount_is_reported_with_path() {
    let account = Account::from_json(json!({
        "name": "Acme",
        "status": "active",
        "email": null,
        "balance": "1,000"
    }))
    .unwrap();
    let err = account.validate().unwrap_err();
    assert_eq!(err.kind(), ModelErrorKind::Decode);
    assert_eq!(err.path(), "balance");
}

#[test]
fn test_store_serde_is_transparent() {
    let store: PropertyStore = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
    assert_eq!(serde_json::to_string(&store).unwrap(), r#"{"b":1,"a":2}"#);
    assert!(serde_json::from_str::<PropertyStore>("[1]").is_err());
}
