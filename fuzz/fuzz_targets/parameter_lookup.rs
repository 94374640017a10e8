#![no_main]

use ferrous_container::{ContainerBuilder, DiError, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(path) = std::str::from_utf8(data) else {
        return;
    };

    let mut builder = ContainerBuilder::new();
    builder
        .parameter(
            "a",
            Value::map([("b", Value::map([("c", 1)])), ("list", Value::List(vec![Value::from(2)]))]),
        )
        .parameter("unset", Value::Null)
        .parameter("", 3);
    let container = builder.build();

    match container.get_parameter(path) {
        Ok(value) => {
            assert!(!value.is_null());
            assert!(container.has_parameter(path));
        }
        Err(DiError::ParameterNotFound(missing)) => {
            assert_eq!(missing, path);
            assert!(!container.has_parameter(path));
        }
        Err(other) => panic!("unexpected error for {:?}: {}", path, other),
    }
});
