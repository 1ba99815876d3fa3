use config_injector::{Container, DefinitionMap, Factory, Lifetime};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Settings(String);

fn base() -> (Container, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut defs = DefinitionMap::new();
    defs.add_value("env", "prod".to_string()).add_singleton(
        "settings",
        Factory::new(move |deps, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Settings(deps.get::<String>("env")?.to_string()))
        })
        .depends_on(["env"]),
    );
    (Container::from_definitions(defs), calls)
}

#[test]
fn chaining_preserves_resolved_singletons() {
    let (container, calls) = base();
    let settings = container.get::<Settings>("settings").unwrap();

    let mut extra = DefinitionMap::new();
    extra.add_value("k", 1u8);
    let chained = container.chain(extra);

    assert!(Arc::ptr_eq(&settings, &chained.get::<Settings>("settings").unwrap()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn chained_definitions_are_added() {
    let (container, _) = base();
    let mut extra = DefinitionMap::new();
    extra.add_transient(
        "greeting",
        Factory::new(|deps, _, _| Ok(format!("hello {}", deps.get::<Settings>("settings")?.0)))
            .depends_on(["settings"]),
    );

    let chained = container.chain(extra);
    assert_eq!(*chained.get::<String>("greeting").unwrap(), "hello prod");
    assert_eq!(
        chained.tokens().names().collect::<Vec<_>>(),
        vec!["env", "settings", "greeting"]
    );
    assert!(!container.contains("greeting"));
}

#[test]
fn chained_values_override_cached_values() {
    let (container, _) = base();
    assert_eq!(*container.get::<String>("env").unwrap(), "prod");

    let mut extra = DefinitionMap::new();
    extra.add_value("env", "dev".to_string());
    let chained = container.chain(extra);

    assert_eq!(*chained.get::<String>("env").unwrap(), "dev");
    assert_eq!(*container.get::<String>("env").unwrap(), "prod");
}

#[test]
fn overriding_a_resolved_factory_keeps_the_cached_instance() {
    let (container, _) = base();
    let settings = container.get::<Settings>("settings").unwrap();

    let mut extra = DefinitionMap::new();
    extra.add_transient("settings", Factory::new(|_, _, _| Ok(Settings("other".into()))));
    let chained = container.chain(extra);

    assert_eq!(chained.lifetime_of("settings"), Some(Lifetime::Transient));
    assert!(Arc::ptr_eq(&settings, &chained.get::<Settings>("settings").unwrap()));
}

#[test]
fn lineages_diverge_after_chaining() {
    let (container, calls) = base();
    let chained = container.chain(DefinitionMap::new());

    let a = chained.get::<Settings>("settings").unwrap();
    let b = container.get::<Settings>("settings").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn chaining_a_validated_container_drops_the_proof() {
    let (container, _) = base();
    container.resolve("settings").unwrap();
    let validated = container.safe_validate_config_singletons().unwrap();
    let chained: Container = validated.chain(DefinitionMap::new());
    assert!(chained.safe_validate_config_singletons().is_ok());
}
