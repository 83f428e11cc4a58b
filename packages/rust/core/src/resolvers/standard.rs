//! Resolvers for code snippet collections.

use snipkit_shared::ResolverKind;

use super::{ResolvedFields, Resolver, before_first_pre, fields, pre_blocks};

/// Default resolver: prose description plus source and example blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdResolver;

impl Resolver for StdResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Std
    }

    fn resolve(&self, html: &str) -> ResolvedFields {
        let blocks = pre_blocks(html);
        fields([
            ("description", Some(before_first_pre(html))),
            ("srcCode", blocks.first().copied()),
            ("exampleCode", blocks.get(1).copied()),
        ])
    }
}

/// Component snippets: like [`StdResolver`], with a leading style block when
/// the snippet carries three code blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsxResolver;

impl Resolver for JsxResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Jsx
    }

    fn resolve(&self, html: &str) -> ResolvedFields {
        let blocks = pre_blocks(html);
        let description = Some(before_first_pre(html));

        if blocks.len() > 2 {
            fields([
                ("description", description),
                ("styleCode", blocks.first().copied()),
                ("srcCode", blocks.get(1).copied()),
                ("exampleCode", blocks.get(2).copied()),
            ])
        } else {
            fields([
                ("description", description),
                ("srcCode", blocks.first().copied()),
                ("exampleCode", blocks.get(1).copied()),
            ])
        }
    }
}
