use ferrous_container::{
    Argument, Container, ContainerBuilder, ContainerErrorKind, DiError, MethodCall,
    ServiceDefinition, Value,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every setter call so ordering can be checked.
#[derive(Default)]
struct Widget {
    log: Mutex<Vec<String>>,
}

impl Widget {
    fn record(&self, entry: String) {
        self.log.lock().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

struct Label(String);

fn container(definition: ServiceDefinition) -> Container {
    let mut builder = ContainerBuilder::new();
    builder
        .parameter("widget", Value::map([("size", 3)]))
        .service("widget", definition)
        .service(
            "label",
            ServiceDefinition::new("Label").with_argument(Argument::literal("hello")),
        );

    let classes = builder.classes_mut();
    classes
        .register("Widget", |args| {
            let widget = Widget::default();
            widget.record(format!("new({})", args.len()));
            Ok(widget)
        })
        .method("setX", |widget: &Widget, args| {
            widget.record(format!("setX({})", args.i64(0)?));
            Ok(())
        })
        .method("setSize", |widget: &Widget, args| {
            widget.record(format!("setSize({})", args.i64(0)?));
            Ok(())
        })
        .method("setLabel", |widget: &Widget, args| {
            let label = args.instance::<Label>(0)?;
            widget.record(format!("setLabel({})", label.0));
            Ok(())
        })
        .method("fail", |_: &Widget, args| {
            Err(DiError::InvalidArgument {
                service: args.service().to_string(),
                position: 0,
                expected: "nothing",
            })
        });
    classes.register("Label", |args| Ok(Label(args.string(0)?)));
    builder.build()
}

#[test]
fn test_call_invoked_once_after_construction() {
    let container = container(
        ServiceDefinition::new("Widget")
            .with_call(MethodCall::new("setX").with_argument(Argument::literal(5))),
    );

    let widget = container.get_as::<Widget>("widget").unwrap();
    assert_eq!(widget.entries(), vec!["new(0)", "setX(5)"]);

    let again = container.get_as::<Widget>("widget").unwrap();
    assert!(Arc::ptr_eq(&widget, &again));
    assert_eq!(again.entries(), vec!["new(0)", "setX(5)"]);
}

#[test]
fn test_calls_run_in_declaration_order_with_resolved_arguments() {
    let container = container(
        ServiceDefinition::new("Widget")
            .with_call(MethodCall::new("setSize").with_argument(Argument::parameter("widget.size")))
            .with_call(MethodCall::new("setLabel").with_argument(Argument::service("label")))
            .with_call(MethodCall::new("setX").with_argument(Argument::literal(1))),
    );

    let widget = container.get_as::<Widget>("widget").unwrap();
    assert_eq!(
        widget.entries(),
        vec!["new(0)", "setSize(3)", "setLabel(hello)", "setX(1)"]
    );
    assert!(container.is_cached("label"));
}

#[test]
fn test_call_without_method_is_malformed() {
    let container = container(
        ServiceDefinition::new("Widget")
            .with_call(MethodCall::new("setX").with_argument(Argument::literal(1)))
            .with_call(MethodCall::default()),
    );

    let err = container.get("widget").unwrap_err();
    assert_eq!(
        err,
        DiError::MalformedCall {
            service: "widget".into(),
            index: 1,
        }
    );
    assert_eq!(err.container_kind(), Some(ContainerErrorKind::MalformedCall));
    assert!(!container.is_cached("widget"));
}

#[test]
fn test_uncallable_method() {
    let container = container(ServiceDefinition::new("Widget").with_call(MethodCall::new("explode")));

    let err = container.get("widget").unwrap_err();
    assert_eq!(
        err,
        DiError::UncallableMethod {
            service: "widget".into(),
            method: "explode".into(),
        }
    );
    assert_eq!(err.container_kind(), Some(ContainerErrorKind::UncallableMethod));
}

#[test]
fn test_uncallable_checked_before_arguments() {
    // The argument would fail too; the method check comes first.
    let container = container(
        ServiceDefinition::new("Widget")
            .with_call(MethodCall::new("explode").with_argument(Argument::parameter("nope"))),
    );

    assert!(matches!(
        container.get("widget"),
        Err(DiError::UncallableMethod { .. })
    ));
}

#[test]
fn test_method_error_aborts_construction() {
    let container = container(ServiceDefinition::new("Widget").with_call(MethodCall::new("fail")));

    assert!(matches!(
        container.get("widget"),
        Err(DiError::InvalidArgument { ref service, .. }) if service == "widget"
    ));
    assert!(!container.is_cached("widget"));
}

#[test]
fn test_method_argument_missing_parameter() {
    let container = container(
        ServiceDefinition::new("Widget")
            .with_call(MethodCall::new("setSize").with_argument(Argument::parameter("widget.depth"))),
    );

    assert_eq!(
        container.get("widget").err(),
        Some(DiError::ParameterNotFound("widget.depth".into()))
    );
}
