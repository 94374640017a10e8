use ferrous_container::{
    Argument, Container, ContainerBuilder, ContainerErrorKind, DiError, MethodCall,
    ServiceDefinition,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Every service is a `Node` that just counts how often it was built.
fn graph(edges: &[(&str, Vec<&str>)], built: Arc<AtomicUsize>) -> Container {
    let mut builder = ContainerBuilder::new();
    for (name, deps) in edges {
        builder.service(
            *name,
            ServiceDefinition::new("Node").with_arguments(deps.iter().map(|d| Argument::service(*d))),
        );
    }
    builder.classes_mut().register("Node", move |args| {
        built.fetch_add(1, Ordering::SeqCst);
        Ok(args.len())
    });
    builder.build()
}

fn circular_path(err: DiError) -> Vec<String> {
    match err {
        DiError::Circular(path) => path,
        other => panic!("Expected Circular error, got {:?}", other),
    }
}

#[test]
fn test_self_circular_dependency() {
    let container = graph(&[("a", vec!["a"])], Arc::new(AtomicUsize::new(0)));

    let path = circular_path(container.get("a").unwrap_err());
    assert_eq!(path, vec!["a", "a"]);
}

#[test]
fn test_two_level_circular() {
    let container = graph(
        &[("a", vec!["b"]), ("b", vec!["a"])],
        Arc::new(AtomicUsize::new(0)),
    );

    let err = container.get("a").unwrap_err();
    assert_eq!(err.container_kind(), Some(ContainerErrorKind::CircularReference));
    assert_eq!(circular_path(err), vec!["a", "b", "a"]);

    // Starting from the other end reports the rotated path.
    assert_eq!(circular_path(container.get("b").unwrap_err()), vec!["b", "a", "b"]);
}

#[test]
fn test_three_level_circular() {
    let container = graph(
        &[("x", vec!["y"]), ("y", vec!["z"]), ("z", vec!["x"])],
        Arc::new(AtomicUsize::new(0)),
    );

    assert_eq!(
        circular_path(container.get("x").unwrap_err()),
        vec!["x", "y", "z", "x"]
    );
}

#[test]
fn test_cycle_does_not_poison_unrelated_services() {
    let built = Arc::new(AtomicUsize::new(0));
    let container = graph(
        &[("a", vec!["b"]), ("b", vec!["a"]), ("c", vec!["d"]), ("d", vec![])],
        built.clone(),
    );

    assert!(container.get("a").is_err());
    assert!(container.get("c").is_ok());
    assert_eq!(built.load(Ordering::SeqCst), 2);

    // Still the same failure, not a stale in-progress state.
    assert_eq!(circular_path(container.get("a").unwrap_err()), vec!["a", "b", "a"]);
    assert!(!container.is_cached("a"));
    assert!(!container.is_cached("b"));
}

#[test]
fn test_diamond_is_not_circular() {
    let built = Arc::new(AtomicUsize::new(0));
    let container = graph(
        &[
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["d"]),
            ("d", vec![]),
        ],
        built.clone(),
    );

    assert_eq!(*container.get_as::<usize>("a").unwrap(), 2);
    assert_eq!(built.load(Ordering::SeqCst), 4);
}

#[test]
fn test_repeated_argument_is_not_circular() {
    let built = Arc::new(AtomicUsize::new(0));
    let container = graph(&[("a", vec!["b", "b"]), ("b", vec![])], built.clone());

    assert_eq!(*container.get_as::<usize>("a").unwrap(), 2);
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cycle_through_method_call() {
    let mut builder = ContainerBuilder::new();
    builder
        .service(
            "a",
            ServiceDefinition::new("Node")
                .with_call(MethodCall::new("attach").with_argument(Argument::service("b"))),
        )
        .service(
            "b",
            ServiceDefinition::new("Node").with_argument(Argument::service("a")),
        );
    builder
        .classes_mut()
        .register("Node", |_| Ok(()))
        .method("attach", |_: &(), _| Ok(()));
    let container = builder.build();

    assert_eq!(circular_path(container.get("a").unwrap_err()), vec!["a", "b", "a"]);
    assert!(!container.is_cached("a"));
}

#[test]
fn test_dependency_built_before_failure_stays_cached() {
    let built = Arc::new(AtomicUsize::new(0));
    let container = graph(
        &[("a", vec!["leaf", "b"]), ("b", vec!["a"]), ("leaf", vec![])],
        built.clone(),
    );

    assert!(container.get("a").is_err());
    assert!(container.is_cached("leaf"));
    assert!(!container.is_cached("a"));

    container.get("leaf").unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_constructor_releases_resolution_chain() {
    let mut builder = ContainerBuilder::new();
    builder
        .service("bomb", ServiceDefinition::new("Bomb"))
        .service("ok", ServiceDefinition::new("Fine"));
    builder.classes_mut().register("Bomb", |_| -> ferrous_container::DiResult<()> {
        panic!("boom")
    });
    builder.classes_mut().register("Fine", |_| Ok(()));
    let container = builder.build();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| container.get("bomb")));
    assert!(outcome.is_err());

    // A leftover frame would turn this into a circular reference.
    let second = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| container.get("bomb")));
    assert!(second.is_err());
    assert!(container.get("ok").is_ok());
}

fn chain(length: usize) -> Container {
    let names: Vec<String> = (0..length).map(|i| format!("s{}", i)).collect();
    let mut builder = ContainerBuilder::new();
    for (i, name) in names.iter().enumerate() {
        let mut definition = ServiceDefinition::new("Node");
        if let Some(next) = names.get(i + 1) {
            definition = definition.with_argument(Argument::service(next.as_str()));
        }
        builder.service(name.as_str(), definition);
    }
    builder.classes_mut().register("Node", |_| Ok(()));
    builder.build()
}

#[test]
fn test_depth_exceeded_on_default_stack() {
    // Plain spawned thread: the limit must trip before the stack runs out.
    let container = chain(1100);
    let result = std::thread::spawn(move || {
        let result = container.get("s0").map(|_| ());
        (result, container.cached_count())
    })
    .join()
    .unwrap();

    assert_eq!(result, (Err(DiError::DepthExceeded(128)), 0));
}

#[test]
fn test_chain_at_depth_limit_resolves() {
    let container = chain(128);
    let result = std::thread::spawn(move || container.get("s0").map(|_| container.cached_count()))
        .join()
        .unwrap();

    assert_eq!(result, Ok(128));
}
