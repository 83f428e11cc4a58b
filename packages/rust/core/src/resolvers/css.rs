use snipkit_shared::ResolverKind;

use super::{ResolvedFields, Resolver, fields, pre_blocks};

/// Styling snippets: markup, stylesheet and script blocks, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssResolver;

impl Resolver for CssResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Css
    }

    fn resolve(&self, html: &str) -> ResolvedFields {
        let blocks = pre_blocks(html);
        fields([
            ("htmlCode", blocks.first().copied()),
            ("cssCode", blocks.get(1).copied()),
            ("jsCode", blocks.get(2).copied()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_blocks_in_order() {
        let html = "<p>Button.</p><pre><code>&lt;button&gt;</code></pre><pre><code>button{}</code></pre>";
        let fields = CssResolver.resolve(html);
        assert!(fields["htmlCode"].contains("&lt;button&gt;"));
        assert!(fields["cssCode"].contains("button{}"));
        assert_eq!(fields["jsCode"], "");
    }
}
