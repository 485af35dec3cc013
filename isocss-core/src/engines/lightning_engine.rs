// isocss-core/src/engines/lightning_engine.rs
//! A `NamespaceEngine` implementation backed by lightningcss.
//!
//! The source is wrapped in `.prefix { ... }` and the resulting stylesheet is
//! printed with nesting lowering forced on, which expands every nested rule
//! into a flat selector starting with the prefix class. Grouping at-rules
//! (`@media`, `@supports`, ...) bubble up with prefixed selectors inside.
//! At-rules that may not appear inside a style rule (`@import`,
//! `@font-face`, `@keyframes`, ...) are passed through ahead of the wrapper;
//! a grouping rule holding both kinds is split in two.
//!
//! Leading `/*! ... */` comments and source-map references survive the
//! reprint.
//!
//! License: MIT OR APACHE 2.0

use lightningcss::error::{Error, ParserError};
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserFlags, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Features, Targets};
use lightningcss::traits::ToCss;
use log::debug;

use crate::engine::NamespaceEngine;
use crate::engines::delimiters::check_delimiters;
use crate::errors::{IsolateError, SourceLocation};
use crate::options::OutputStyle;
use crate::prefix::PrefixClass;
use crate::sanitizers::source_map::append_source_map_refs;

const SOURCE_FILENAME: &str = "source.css";
const WRAPPED_FILENAME: &str = "namespaced.css";

/// Parser options shared by every lightningcss parse in this crate.
pub(crate) fn parser_options<'o, 'i>(filename: &str) -> ParserOptions<'o, 'i> {
    ParserOptions {
        filename: filename.to_string(),
        flags: ParserFlags::NESTING,
        error_recovery: false,
        ..ParserOptions::default()
    }
}

fn compile_error(err: Error<ParserError<'_>>, location_known: bool) -> IsolateError {
    IsolateError::Compile {
        message: err.kind.to_string(),
        location: if location_known {
            err.loc.as_ref().map(SourceLocation::from_lightning)
        } else {
            None
        },
    }
}

type Split<'i> = (Option<CssRule<'i>>, Option<CssRule<'i>>);

/// Splits `rule` into the part that must stay at the top level and the part
/// that may be nested inside the prefix rule, in that order.
///
/// Grouping rules are split recursively, so `@media print { @page {} .x {} }`
/// yields one `@media` block holding `@page` and another holding `.x`.
fn split_rule<'i>(rule: &CssRule<'i>) -> Split<'i> {
    match rule {
        CssRule::Style(_) => (None, Some(rule.clone())),
        CssRule::Media(media) => split_group(&media.rules, |rules| {
            let mut copy = media.clone();
            copy.rules = rules;
            CssRule::Media(copy)
        }),
        CssRule::Supports(supports) => split_group(&supports.rules, |rules| {
            let mut copy = supports.clone();
            copy.rules = rules;
            CssRule::Supports(copy)
        }),
        CssRule::Container(container) => split_group(&container.rules, |rules| {
            let mut copy = container.clone();
            copy.rules = rules;
            CssRule::Container(copy)
        }),
        CssRule::LayerBlock(layer) => split_group(&layer.rules, |rules| {
            let mut copy = layer.clone();
            copy.rules = rules;
            CssRule::LayerBlock(copy)
        }),
        CssRule::StartingStyle(starting) => split_group(&starting.rules, |rules| {
            let mut copy = starting.clone();
            copy.rules = rules;
            CssRule::StartingStyle(copy)
        }),
        _ => (Some(rule.clone()), None),
    }
}

fn split_group<'i>(rules: &CssRuleList<'i>, rebuild: impl Fn(CssRuleList<'i>) -> CssRule<'i>) -> Split<'i> {
    let mut hoisted = Vec::new();
    let mut nested = Vec::new();
    for child in rules.0.iter() {
        let (h, n) = split_rule(child);
        hoisted.extend(h);
        nested.extend(n);
    }
    let hoisted = (!hoisted.is_empty()).then(|| rebuild(CssRuleList(hoisted)));
    let nested = (!nested.is_empty()).then(|| rebuild(CssRuleList(nested)));
    (hoisted, nested)
}

fn print_rule(rule: &CssRule<'_>) -> Result<Option<String>, IsolateError> {
    let text = rule
        .to_css_string(PrinterOptions::default())
        .map_err(|e| IsolateError::Render(e.to_string()))?;
    Ok((!text.trim().is_empty()).then_some(text))
}

#[derive(Debug, Clone, Default)]
pub struct LightningEngine {
    style: OutputStyle,
}

impl LightningEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: OutputStyle) -> Self {
        Self { style }
    }

    /// Builds the synthetic `.prefix { <source> }` stylesheet.
    ///
    /// Returns `None` when the source has no rule that needs wrapping, in which
    /// case the head holds the whole (possibly empty) output.
    fn wrap(&self, source: &str, prefix: &PrefixClass) -> Result<(String, Option<String>), IsolateError> {
        check_delimiters(source)?;

        let stylesheet = StyleSheet::parse(source, parser_options(SOURCE_FILENAME))
            .map_err(|e| compile_error(e, true))?;

        // Leading `/*! ... */` comments; every other comment is dropped by the parser.
        let mut head = String::new();
        for comment in &stylesheet.license_comments {
            let comment: &str = comment;
            head.push_str(&format!("/*{}*/\n", comment));
        }

        let mut hoisted = Vec::new();
        let mut nested = Vec::new();
        for rule in stylesheet.rules.0.iter() {
            let (top, inner) = split_rule(rule);
            if top.is_some() && inner.is_some() {
                debug!("Split a grouping rule into a passed-through part and a scoped part");
            }
            if let Some(top) = top {
                hoisted.extend(print_rule(&top)?);
            }
            if let Some(inner) = inner {
                nested.extend(print_rule(&inner)?);
            }
        }
        debug!("Namespacing {} rule(s), passing through {} at-rule(s)", nested.len(), hoisted.len());

        head.push_str(&hoisted.join("\n"));
        if nested.is_empty() {
            return Ok((head, None));
        }

        let wrapped = format!("{}\n{} {{\n{}\n}}\n", head, prefix.selector(), nested.join("\n"));
        Ok((head, Some(wrapped)))
    }
}

impl NamespaceEngine for LightningEngine {
    fn name(&self) -> &'static str {
        "lightning"
    }

    fn namespace(&self, source: &str, prefix: &PrefixClass) -> Result<String, IsolateError> {
        let (head, wrapped) = self.wrap(source, prefix)?;
        let printer = PrinterOptions {
            minify: self.style.is_minified(),
            targets: Targets {
                include: Features::Nesting,
                ..Targets::default()
            },
            ..PrinterOptions::default()
        };

        let Some(wrapped) = wrapped else {
            if head.is_empty() {
                return Ok(append_source_map_refs(String::new(), source));
            }
            // Pass-through only: reprint so the output style matches.
            let stylesheet = StyleSheet::parse(&head, parser_options(WRAPPED_FILENAME))
                .map_err(|e| compile_error(e, false))?;
            let out = stylesheet.to_css(printer).map_err(|e| IsolateError::Render(e.to_string()))?;
            return Ok(append_source_map_refs(out.code, source));
        };

        // Locations in the synthetic sheet do not map back onto the source.
        let stylesheet = StyleSheet::parse(&wrapped, parser_options(WRAPPED_FILENAME))
            .map_err(|e| compile_error(e, false))?;
        let out = stylesheet.to_css(printer).map_err(|e| IsolateError::Render(e.to_string()))?;

        debug!("Namespaced stylesheet under '{}' ({} bytes)", prefix.selector(), out.code.len());
        Ok(append_source_map_refs(out.code, source))
    }
}
