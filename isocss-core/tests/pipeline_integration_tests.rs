// isocss-core/tests/pipeline_integration_tests.rs
//! End-to-end tests of the public isolation pipeline.

use anyhow::Result;
use test_log::test;

use isocss_core::{
    headless_isolate_string, isolate_css, EngineKind, IsolateError, IsolateOptions,
    LightningEngine, NamespaceEngine, OutputStyle, PrefixClass,
};

#[test]
fn test_every_top_level_selector_is_scoped() -> Result<()> {
    let prefix = PrefixClass::new("app-ab12cd34ef")?;
    let source = r#"
h1 { color: red; }
.card { padding: 1em; }
ul > li, a:hover { margin: 0; }
"#;
    let out = LightningEngine::new().namespace(source, &prefix)?;

    assert!(out.contains(".app-ab12cd34ef h1{color:red}"), "{out}");
    assert!(out.contains(".app-ab12cd34ef .card{padding:1em}"), "{out}");
    for rule in out.split('}').filter(|r| !r.trim().is_empty()) {
        let selectors = rule.split('{').next().unwrap_or_default();
        for selector in selectors.split(',') {
            assert!(selector.starts_with(".app-ab12cd34ef"), "unscoped selector {selector:?} in {out}");
        }
    }
    Ok(())
}

#[test]
fn test_root_removal_through_the_pipeline() -> Result<()> {
    let prefix = PrefixClass::new("p")?;
    let options = IsolateOptions { remove_root_from_selectors: true, ..IsolateOptions::default() };
    let out = headless_isolate_string("body { margin:0 } .card{padding:1em}", &prefix, &options)?;
    assert!(out.contains(".p{margin:0}"), "{out}");
    assert!(out.contains(".p .card{padding:1em}"), "{out}");
    Ok(())
}

#[test]
fn test_html_body_and_root_are_all_removed() -> Result<()> {
    let prefix = PrefixClass::new("p")?;
    let options = IsolateOptions { remove_root_from_selectors: true, ..IsolateOptions::default() };
    let out = headless_isolate_string(
        ":root { --gap: 4px } html body > main { gap: var(--gap) }",
        &prefix,
        &options,
    )?;
    assert!(!out.contains("html"), "{out}");
    assert!(!out.contains("body"), "{out}");
    assert!(!out.contains(":root"), "{out}");
    assert!(out.contains(".p>main"), "{out}");
    Ok(())
}

#[test]
fn test_style_rules_inside_mixed_grouping_rules_are_scoped() -> Result<()> {
    let prefix = PrefixClass::new("p")?;
    let out = headless_isolate_string(
        "@media print { @page { margin: 0 } .x { color: red } }",
        &prefix,
        &IsolateOptions::default(),
    )?;
    assert!(out.contains(".p .x{color:red}"), "{out}");
    assert!(!out.contains("{.x{"), "{out}");
    Ok(())
}

#[test]
fn test_source_maps_are_stripped_only_when_asked() -> Result<()> {
    let prefix = PrefixClass::new("p")?;
    let engine = LightningEngine::new();
    let source = "a { color: red }\n/*# sourceMappingURL=site.css.map */\n";

    let kept = isolate_css(&engine, source, &prefix, &IsolateOptions::default())?;
    assert!(kept.contains(".p a{color:red}"), "{kept}");
    assert!(kept.contains("/*# sourceMappingURL=site.css.map */"), "{kept}");

    let stripped = isolate_css(
        &engine,
        source,
        &prefix,
        &IsolateOptions { remove_source_maps: true, ..IsolateOptions::default() },
    )?;
    assert!(!stripped.contains("sourceMappingURL"), "{stripped}");
    assert!(stripped.contains(".p a{color:red}"), "{stripped}");
    Ok(())
}

#[test]
fn test_unterminated_rule_is_a_compile_error() -> Result<()> {
    let prefix = PrefixClass::new("p")?;
    let err = headless_isolate_string(".card {\n  color: red;\n", &prefix, &IsolateOptions::default())
        .unwrap_err();
    assert!(err.is_compile_error(), "{err}");
    assert!(err.location().is_some());

    let tagged = err.in_file("styles/site.css");
    assert!(tagged.to_string().starts_with("styles/site.css: "), "{tagged}");
    assert!(matches!(tagged.root(), IsolateError::Compile { .. }));
    Ok(())
}

#[test]
fn test_pretty_output_is_indented() -> Result<()> {
    let prefix = PrefixClass::new("p")?;
    let options = IsolateOptions { pretty: true, ..IsolateOptions::default() };
    assert_eq!(options.output_style(), OutputStyle::Pretty);
    let out = headless_isolate_string("h1 { color: red }", &prefix, &options)?;
    assert!(out.contains(".p h1 {\n"), "{out}");
    Ok(())
}

#[test]
fn test_derived_prefix_is_usable() -> Result<()> {
    let prefix = PrefixClass::derive("@scope/My Widget")?;
    assert_eq!(PrefixClass::derive("@scope/My Widget")?, prefix);
    let out = headless_isolate_string("p { margin: 0 }", &prefix, &IsolateOptions::default())?;
    assert!(out.starts_with(&prefix.selector()), "{out}");
    assert_eq!(EngineKind::default(), EngineKind::Lightning);
    Ok(())
}
