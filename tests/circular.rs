use config_injector::{Container, DefinitionMap, DiError, Factory, Token};

fn cycle_defs() -> DefinitionMap {
    let mut defs = DefinitionMap::new();
    defs.add_singleton("d", Factory::new(|_, _, _| Ok(())).depends_on(["e"]))
        .add_singleton("e", Factory::new(|_, _, _| Ok(())).depends_on(["f"]))
        .add_singleton("f", Factory::new(|_, _, _| Ok(())).depends_on(["d"]));
    defs
}

fn path_of(err: DiError) -> Vec<String> {
    match err {
        DiError::Circular(path) => path.iter().map(Token::to_string).collect(),
        other => panic!("expected a circular dependency error, got {:?}", other),
    }
}

#[test]
fn three_token_cycle_reports_the_full_path() {
    let container = Container::from_definitions(cycle_defs());
    let err = container.resolve("d").unwrap_err();
    assert_eq!(err.to_string(), "Circular dependency: d -> e -> f -> d");
    assert_eq!(path_of(err), vec!["d", "e", "f", "d"]);
}

#[test]
fn cycle_path_starts_at_the_requested_token() {
    let container = Container::from_definitions(cycle_defs());
    assert_eq!(path_of(container.resolve("e").unwrap_err()), vec!["e", "f", "d", "e"]);
    assert_eq!(path_of(container.resolve("f").unwrap_err()), vec!["f", "d", "e", "f"]);
}

#[test]
fn failed_cycle_leaves_nothing_cached() {
    let container = Container::from_definitions(cycle_defs());
    assert!(container.resolve("d").is_err());
    for token in ["d", "e", "f"] {
        assert!(!container.is_cached(token));
    }
    assert!(container.resolve("d").is_err());
}

#[test]
fn self_dependency_is_a_cycle() {
    let mut defs = DefinitionMap::new();
    defs.add_transient("d", Factory::new(|_, _, _| Ok(())).depends_on(["d"]));

    let container = Container::from_definitions(defs);
    assert_eq!(
        container.resolve("d").unwrap_err().to_string(),
        "Circular dependency: d -> d"
    );
}

#[test]
fn dynamic_resolution_cycles_are_detected() {
    let mut defs = DefinitionMap::new();
    defs.add_scoped(
        "a",
        Factory::new(|_, resolver, _| {
            resolver.resolve("b")?;
            Ok(())
        }),
    );
    defs.add_scoped("b", Factory::new(|_, _, _| Ok(())).depends_on(["a"]));

    let container = Container::from_definitions(defs);
    assert_eq!(path_of(container.resolve("a").unwrap_err()), vec!["a", "b", "a"]);
}

#[test]
fn diamond_is_not_a_cycle() {
    let mut defs = DefinitionMap::new();
    defs.add_value("base", 1u32)
        .add_transient(
            "left",
            Factory::new(|deps, _, _| Ok(*deps.get::<u32>("base")? + 1)).depends_on(["base"]),
        )
        .add_transient(
            "right",
            Factory::new(|deps, _, _| Ok(*deps.get::<u32>("base")? + 2)).depends_on(["base"]),
        )
        .add_transient(
            "top",
            Factory::new(|deps, _, _| Ok(*deps.get::<u32>("left")? + *deps.get::<u32>("right")?))
                .depends_on(["left", "right"]),
        );

    let container = Container::from_definitions(defs);
    assert_eq!(*container.get::<u32>("top").unwrap(), 5);
}

#[test]
fn cycle_behind_a_cached_token_is_not_reached() {
    let mut defs = cycle_defs();
    defs.add_value("f", ());

    let container = Container::from_definitions(defs);
    assert!(container.resolve("d").is_ok());
}
