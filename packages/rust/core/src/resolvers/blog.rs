use snipkit_shared::ResolverKind;

use super::{ResolvedFields, Resolver, fields, first_paragraph, without_first_heading};

/// Article collections: a teaser paragraph and the body without its title.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogResolver;

impl Resolver for BlogResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Blog
    }

    fn resolve(&self, html: &str) -> ResolvedFields {
        let full = without_first_heading(html);
        fields([
            ("description", Some(first_paragraph(html))),
            ("fullDescription", Some(full.as_str())),
        ])
    }
}
