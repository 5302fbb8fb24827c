use crate::generator::naming::identifiers::{
  accessor_name_for_class, is_valid_identifier, module_name_for_class, sanitize, to_class_name, to_module_segment,
  to_python_identifier, to_type_name,
};

#[test]
fn test_sanitize() {
  assert_eq!(sanitize("page-size"), "page_size");
  assert_eq!(sanitize("--a..b__c--"), "a_b_c");
  assert_eq!(sanitize("café"), "cafe");
  assert_eq!(sanitize(""), "");
}

#[test]
fn test_to_python_identifier() {
  assert_eq!(to_python_identifier("id"), "id");
  assert_eq!(to_python_identifier("page-size"), "page_size");
  assert_eq!(to_python_identifier("userId"), "user_id");
  assert_eq!(to_python_identifier("from"), "from_");
  assert_eq!(to_python_identifier("self"), "self_");
  assert_eq!(to_python_identifier("2fa"), "_2fa");
  assert_eq!(to_python_identifier("$$"), "_");
}

#[test]
fn test_is_valid_identifier() {
  assert!(is_valid_identifier("call_id"));
  assert!(is_valid_identifier("_private"));
  assert!(!is_valid_identifier("call-id"));
  assert!(!is_valid_identifier("1st"));
  assert!(!is_valid_identifier("class"));
  assert!(!is_valid_identifier(""));
}

#[test]
fn test_to_class_name() {
  assert_eq!(to_class_name("sms-messages"), "SmsMessages");
  assert_eq!(to_class_name("call_center"), "CallCenter");
  assert_eq!(to_class_name("widgets"), "Widgets");
}

#[test]
fn test_to_type_name() {
  assert_eq!(to_type_name("CallProto"), "CallProto");
  assert_eq!(to_type_name("HTTPError"), "HTTPError");
  assert_eq!(to_type_name("Widget-v2"), "WidgetV2");
  assert_eq!(to_type_name("None"), "None_");
}

#[test]
fn test_to_module_segment() {
  assert_eq!(to_module_segment("call"), "call");
  assert_eq!(to_module_segment("call-log"), "call_log");
  assert_eq!(to_module_segment("import"), "import_");
}

#[test]
fn test_class_derived_names() {
  assert_eq!(module_name_for_class("WidgetsResource"), "widgets_resource");
  assert_eq!(accessor_name_for_class("WidgetsResource", "Resource"), "widgets");
  assert_eq!(accessor_name_for_class("CallCentersResource", "Resource"), "call_centers");
  assert_eq!(accessor_name_for_class("Resource", "Resource"), "resource");
  assert_eq!(accessor_name_for_class("Misc", "Resource"), "misc");
}
