use config_injector::{
    Container, DefinitionMap, DependencyParam, DiError, Factory, Instance, Lifetime, Provision,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Widget {
    label: String,
}

#[test]
fn value_singleton_returns_the_stored_value() {
    let mut defs = DefinitionMap::new();
    defs.add_value("a", "a".to_string());

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<String>("a").unwrap(), "a");
    assert!(container.resolve("a").unwrap().ptr_eq(&container.resolve("a").unwrap()));
}

#[test]
fn singleton_factory_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut defs = DefinitionMap::new();
    defs.add_value("a", "a".to_string());
    defs.add_singleton(
        "b",
        Factory::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(5u32)
        })
        .depends_on(["a"]),
    );

    let container = Container::from_definitions(defs);
    let first = container.get::<u32>("b").unwrap();
    let second = container.get::<u32>("b").unwrap();
    assert_eq!(*first, 5);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn transient_is_fresh_every_time() {
    let mut defs = DefinitionMap::new();
    defs.add_transient("t", Factory::new(|_, _, _| Ok(Widget { label: "t".into() })));

    let container = Container::from_definitions(defs);
    let a = container.get::<Widget>("t").unwrap();
    let b = container.get::<Widget>("t").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.label, b.label);
}

#[test]
fn scoped_is_cached_within_one_container() {
    let mut defs = DefinitionMap::new();
    defs.add_scoped("s", Factory::new(|_, _, _| Ok(Widget { label: "s".into() })));

    let container = Container::from_definitions(defs);
    let a = container.get::<Widget>("s").unwrap();
    let b = container.get::<Widget>("s").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn dependencies_are_resolved_before_the_factory_runs() {
    let mut defs = DefinitionMap::new();
    defs.add_value("host", "localhost".to_string());
    defs.add_value("port", 5432u16);
    defs.add_singleton(
        "url",
        Factory::new(|deps, _, _| {
            let host = deps.get::<String>("host")?;
            let port = deps.get::<u16>("port")?;
            Ok(format!("postgres://{}:{}", host, port))
        })
        .depends_on(["host", "port"]),
    );

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<String>("url").unwrap(), "postgres://localhost:5432");
    assert_eq!(
        container.definitions().get("url").and_then(|d| d.factory()).map(|f| f.param().clone()),
        Some(DependencyParam::Declared(vec!["host".into(), "port".into()]))
    );
}

#[test]
fn placeholder_declares_no_dependencies() {
    let mut defs = DefinitionMap::new();
    defs.add_transient("t", Factory::new(|deps, _, _| Ok(deps.len())).depends_on(["_"]));

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<usize>("t").unwrap(), 0);
}

#[test]
fn unknown_token_is_unresolvable() {
    let container = Container::from_definitions(DefinitionMap::new());
    match container.resolve("nope") {
        Err(DiError::Unresolvable(token)) => assert_eq!(token, "nope"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_dependency_is_unresolvable() {
    let mut defs = DefinitionMap::new();
    defs.add_transient("t", Factory::new(|_, _, _| Ok(1u8)).depends_on(["ghost"]));

    let container = Container::from_definitions(defs);
    match container.resolve("t") {
        Err(DiError::Unresolvable(token)) => assert_eq!(token, "ghost"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_declaration_names_the_token() {
    let mut defs = DefinitionMap::new();
    defs.add_value("a", 1u8);
    defs.add_singleton("dup", Factory::new(|_, _, _| Ok(1u8)).depends_on(["a", "a"]));

    let container = Container::from_definitions(defs);
    match container.resolve("dup") {
        Err(DiError::InvalidDefinition { token, .. }) => assert_eq!(token, "dup"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn factory_reading_an_undeclared_argument_fails() {
    let mut defs = DefinitionMap::new();
    defs.add_value("a", 1u8);
    defs.add_transient("t", Factory::new(|deps, _, _| Ok(*deps.get::<u8>("a")?)));

    let container = Container::from_definitions(defs);
    assert!(matches!(
        container.resolve("t"),
        Err(DiError::UndeclaredDependency(name)) if name == "a"
    ));
}

#[test]
fn factories_can_resolve_dynamically() {
    let mut defs = DefinitionMap::new();
    defs.add_value("greeting", "hi".to_string());
    defs.add_transient(
        "message",
        Factory::new(|_, resolver, _| {
            assert_eq!(resolver.path().len(), 1);
            Ok(format!("{}!", resolver.get::<String>("greeting")?))
        }),
    );

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<String>("message").unwrap(), "hi!");
}

#[test]
fn shared_factory_keeps_the_allocation() {
    let widget = Arc::new(Widget { label: "shared".into() });
    let handle = widget.clone();

    let mut defs = DefinitionMap::new();
    defs.add_singleton("w", Factory::shared(move |_, _, _| Ok(handle.clone())));

    let container = Container::from_definitions(defs);
    assert!(Arc::ptr_eq(&widget, &container.get::<Widget>("w").unwrap()));
}

#[test]
fn erased_factory_can_return_any_instance() {
    let mut defs = DefinitionMap::new();
    defs.add_transient("e", Factory::erased(|_, _, _| Ok(Instance::new(3i64))));

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<i64>("e").unwrap(), 3);
}

#[test]
fn runtime_lifetimes_build_the_same_definitions() {
    let mut defs = DefinitionMap::new();
    defs.add_with_lifetime("v", Lifetime::Singleton, Provision::Value(Instance::new(1u8)))
        .unwrap();
    defs.add_with_lifetime(
        "s",
        Lifetime::Scoped,
        Provision::Factory(Factory::new(|_, _, _| Ok(2u8))),
    )
    .unwrap();

    let container = Container::from_definitions(defs);
    assert_eq!(container.lifetime_of("v"), Some(Lifetime::Singleton));
    assert_eq!(container.lifetime_of("s"), Some(Lifetime::Scoped));
    assert_eq!(container.lifetime_of("x"), None);
    assert_eq!(*container.get::<u8>("s").unwrap(), 2);
}

#[test]
fn tokens_cover_every_declaration() {
    let mut defs = DefinitionMap::new();
    defs.add_value("logger", ())
        .add_transient("handler", Factory::new(|_, _, _| Ok(())))
        .add_scoped("session", Factory::new(|_, _, _| Ok(())));

    let container = Container::from_definitions(defs);
    let tokens = container.tokens();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens.names().collect::<Vec<_>>(), vec!["logger", "handler", "session"]);
    assert!(container.resolve(&tokens["session"]).is_ok());
}

#[test]
fn widget_end_to_end() {
    let mut defs = DefinitionMap::new();
    defs.add_value("a", "a".to_string())
        .add_singleton("b", Factory::new(|_, _, _| Ok(5u32)).depends_on(["a"]))
        .add_scoped(
            "c",
            Factory::new(|deps, _, _| {
                Ok(Widget {
                    label: deps.get::<String>("a")?.to_string(),
                })
            })
            .depends_on(["a"]),
        );

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<String>("a").unwrap(), "a");
    assert_eq!(*container.get::<u32>("b").unwrap(), 5);

    let scope1 = container.create_scope();
    let scope2 = container.create_scope();
    let w1 = scope1.get::<Widget>("c").unwrap();
    let w2 = scope2.get::<Widget>("c").unwrap();
    assert!(!Arc::ptr_eq(&w1, &w2));
    assert!(Arc::ptr_eq(&w1, &scope1.get::<Widget>("c").unwrap()));
    assert_eq!(w1.label, "a");
    assert_eq!(w2.label, "a");
}
