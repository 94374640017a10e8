#![no_main]

use ferrous_container::{Argument, ContainerBuilder, DiError, MethodCall, ServiceDefinition, Value};
use libfuzzer_sys::fuzz_target;

// Each input byte pair describes one reference: (from, to) over a small name
// space. The high bits of the first byte pick the argument kind, so the graph
// mixes service references, parameter references, method calls and malformed
// entries. Resolution must never panic and must only fail with the
// documented errors.
fuzz_target!(|data: &[u8]| {
    const NAMES: u8 = 8;
    let name = |i: u8| format!("s{}", i % NAMES);

    let mut definitions: Vec<ServiceDefinition> =
        (0..NAMES).map(|_| ServiceDefinition::new("Node")).collect();

    for pair in data.chunks_exact(2) {
        let (from, to) = (pair[0], pair[1]);
        let definition = &mut definitions[(from % NAMES) as usize];
        match from >> 5 {
            0 | 1 | 2 => definition.arguments.push(Argument::service(name(to))),
            3 => definition.arguments.push(Argument::parameter(if to % 2 == 0 { "p.x" } else { "p.y" })),
            4 => definition
                .calls
                .push(MethodCall::new("touch").with_argument(Argument::service(name(to)))),
            5 => definition.calls.push(MethodCall::new(if to % 2 == 0 { "touch" } else { "nope" })),
            6 => definition.class = if to % 2 == 0 { None } else { Some("Ghost".into()) },
            _ => definition.arguments.push(Argument::service(format!("missing{}", to))),
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.parameter("p", Value::map([("x", 1)]));
    for (i, definition) in definitions.into_iter().enumerate() {
        builder.service(name(i as u8), definition);
    }
    builder
        .classes_mut()
        .register("Node", |args| Ok(args.len()))
        .method("touch", |_: &usize, _| Ok(()));
    let container = builder.build();

    let validation = container.validate();

    for i in 0..NAMES {
        let service = name(i);
        match container.get(&service) {
            Ok(first) => {
                assert!(container.is_cached(&service));
                let second = container.get(&service).unwrap();
                assert!(std::sync::Arc::ptr_eq(&first, &second));
            }
            Err(error) => {
                assert!(!container.is_cached(&service));
                assert!(!validation.is_valid(), "{} failed but validation passed: {}", service, error);
                match error {
                    DiError::Circular(path) => {
                        let (last, chain) = path.split_last().unwrap();
                        assert!(chain.contains(last));
                    }
                    DiError::ServiceNotFound(_)
                    | DiError::ParameterNotFound(_)
                    | DiError::MalformedEntry(_)
                    | DiError::ClassNotFound { .. }
                    | DiError::UncallableMethod { .. } => {}
                    other => panic!("unexpected error: {}", other),
                }
            }
        }
    }
});
