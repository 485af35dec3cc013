//! root_selectors.rs - Removes `html`, `body` and `:root` from compiled selectors.
//!
//! Once a stylesheet is scoped under a prefix class, selectors such as
//! `.prefix body` can never match: the container is not the root element. This
//! module parses the compiled stylesheet and drops those root segments from
//! every selector, so the rule applies to the container itself.
//!
//! Selectors are edited through the parser's own component sequence, which
//! stores compound selectors right to left (matching order). A compound that
//! becomes empty is removed together with the combinator that follows it in
//! that walk, i.e. the one on its left in source order; the leftmost compound
//! takes the combinator on its right instead. As a consequence
//! `.p body > div` becomes `.p > div` (descendant turned into child), which is
//! accepted behaviour.
//!
//! License: MIT OR APACHE 2.0

use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::selector::{Component, Selector, SelectorList};
use lightningcss::stylesheet::{PrinterOptions, StyleSheet};
use log::debug;

use crate::engines::lightning_engine::parser_options;
use crate::errors::{IsolateError, SourceLocation};
use crate::options::OutputStyle;
use crate::sanitizers::source_map::append_source_map_refs;

/// Type selectors that refer to the document root.
const ROOT_ELEMENTS: [&str; 2] = ["html", "body"];

const COMPILED_FILENAME: &str = "compiled.css";

enum Rewrite<'i> {
    Unchanged,
    Replaced(Selector<'i>),
    Emptied,
}

fn is_root_segment(component: &Component<'_>) -> bool {
    match component {
        Component::LocalName(local) => {
            let name: &str = &local.lower_name.0;
            ROOT_ELEMENTS.contains(&name)
        }
        Component::Root => true,
        _ => false,
    }
}

/// Strips root segments from one selector.
fn strip_root_segments<'i>(selector: &Selector<'i>, removed: &mut usize) -> Rewrite<'i> {
    if !selector.iter_raw_match_order().any(is_root_segment) {
        return Rewrite::Unchanged;
    }

    // Matching order: combinators[i] joins compounds[i] and compounds[i + 1].
    let mut compounds: Vec<Vec<Component<'i>>> = vec![Vec::new()];
    let mut combinators: Vec<Component<'i>> = Vec::new();
    for component in selector.iter_raw_match_order() {
        if matches!(component, Component::Combinator(_)) {
            combinators.push(component.clone());
            compounds.push(Vec::new());
        } else if let Some(compound) = compounds.last_mut() {
            compound.push(component.clone());
        }
    }

    let mut i = 0;
    while i < compounds.len() {
        let before = compounds[i].len();
        compounds[i].retain(|c| !is_root_segment(c));
        let stripped = before - compounds[i].len();
        *removed += stripped;

        if stripped == 0 || !compounds[i].is_empty() {
            i += 1;
            continue;
        }

        compounds.remove(i);
        if i < combinators.len() {
            combinators.remove(i);
        } else if i > 0 {
            // Leftmost compound: nothing follows it in the walk.
            combinators.remove(i - 1);
        }
    }

    if compounds.iter().all(Vec::is_empty) {
        return Rewrite::Emptied;
    }

    // Back to parse order for rebuilding.
    let mut parts = Vec::new();
    for (index, compound) in compounds.into_iter().enumerate().rev() {
        parts.extend(compound);
        if index > 0 {
            parts.push(combinators[index - 1].clone());
        }
    }
    Rewrite::Replaced(Selector::from(parts))
}

/// Returns false when every selector of the list was removed.
fn sanitize_selector_list(list: &mut SelectorList<'_>, removed: &mut usize) -> bool {
    let mut changed = false;
    let mut kept = Vec::with_capacity(list.0.len());
    for selector in list.0.iter() {
        match strip_root_segments(selector, removed) {
            Rewrite::Unchanged => kept.push(selector.clone()),
            Rewrite::Replaced(rewritten) => {
                changed = true;
                kept.push(rewritten);
            }
            Rewrite::Emptied => changed = true,
        }
    }
    if changed {
        list.0 = kept.into_iter().collect();
    }
    !list.0.is_empty()
}

fn sanitize_rules(rules: &mut CssRuleList<'_>, removed: &mut usize) {
    rules.0.retain_mut(|rule| match rule {
        CssRule::Style(style) => {
            sanitize_rules(&mut style.rules, removed);
            sanitize_selector_list(&mut style.selectors, removed)
        }
        CssRule::Nesting(nesting) => {
            sanitize_rules(&mut nesting.style.rules, removed);
            sanitize_selector_list(&mut nesting.style.selectors, removed)
        }
        CssRule::Media(media) => {
            sanitize_rules(&mut media.rules, removed);
            true
        }
        CssRule::Supports(supports) => {
            sanitize_rules(&mut supports.rules, removed);
            true
        }
        CssRule::Container(container) => {
            sanitize_rules(&mut container.rules, removed);
            true
        }
        CssRule::LayerBlock(layer) => {
            sanitize_rules(&mut layer.rules, removed);
            true
        }
        CssRule::MozDocument(document) => {
            sanitize_rules(&mut document.rules, removed);
            true
        }
        CssRule::StartingStyle(starting) => {
            sanitize_rules(&mut starting.rules, removed);
            true
        }
        _ => true,
    });
}

/// Removes root segments from a compiled stylesheet and prints it minified.
pub fn sanitize(css: &str) -> Result<String, IsolateError> {
    sanitize_with(css, OutputStyle::Minified)
}

/// Removes root segments from a compiled stylesheet.
///
/// Fails with `IsolateError::Parse` when `css` cannot be parsed; output of a
/// `NamespaceEngine` always can.
pub fn sanitize_with(css: &str, style: OutputStyle) -> Result<String, IsolateError> {
    let mut stylesheet = StyleSheet::parse(css, parser_options(COMPILED_FILENAME)).map_err(|e| {
        IsolateError::Parse {
            message: e.kind.to_string(),
            location: e.loc.as_ref().map(SourceLocation::from_lightning),
        }
    })?;

    let mut removed = 0;
    sanitize_rules(&mut stylesheet.rules, &mut removed);
    debug!("Removed {} root selector segment(s)", removed);

    let out = stylesheet
        .to_css(PrinterOptions {
            minify: style.is_minified(),
            ..PrinterOptions::default()
        })
        .map_err(|e| IsolateError::Render(e.to_string()))?;
    Ok(append_source_map_refs(out.code, css))
}
