/// Body of a collapsible panel
///
/// In soft mode the content stays rendered (and is only hidden) while the
/// panel is collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapsiblePanelBody {
    pub soft_mode: bool,
    pub expanded: Option<bool>,
}

impl CollapsiblePanelBody {
    pub fn render_content(&self) -> bool {
        self.soft_mode || self.expanded.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_content() {
        let mut body = CollapsiblePanelBody::default();
        assert!(!body.render_content());

        body.expanded = Some(true);
        assert!(body.render_content());

        body.expanded = Some(false);
        body.soft_mode = true;
        assert!(body.render_content());
    }
}
