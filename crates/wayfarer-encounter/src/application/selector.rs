//! Picks the template that governs a generation round.

use tracing::{debug, warn};
use wayfarer_core::rng::DeterministicRng;

use crate::domain::encounter::EncounterContext;
use crate::domain::player::PlayerState;
use crate::domain::template::ChoiceSetTemplate;

/// Filters templates by context and draws one from the first few matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSelector {
    shortlist_size: usize,
}

impl TemplateSelector {
    #[must_use]
    pub fn new(shortlist_size: usize) -> Self {
        Self { shortlist_size }
    }

    /// Returns one of the first `shortlist_size` matching templates, in list
    /// order, chosen uniformly through `rng`. Returns `None` when nothing
    /// matches; substituting a fallback is up to the caller.
    pub fn select_template<'t>(
        &self,
        templates: &'t [ChoiceSetTemplate],
        context: &EncounterContext,
        player: &PlayerState,
        rng: &mut dyn DeterministicRng,
    ) -> Option<&'t ChoiceSetTemplate> {
        let shortlist: Vec<&ChoiceSetTemplate> = templates
            .iter()
            .filter(|template| template.matches(context, player))
            .take(self.shortlist_size)
            .collect();

        if shortlist.is_empty() {
            warn!(action_type = %context.action_type, candidates = templates.len(), "no template matches context");
            return None;
        }

        let last = u32::try_from(shortlist.len() - 1).unwrap_or(u32::MAX);
        let pick = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
        let selected = shortlist.get(pick).copied().or_else(|| shortlist.last().copied());
        if let Some(template) = selected {
            debug!(template = %template.name, shortlisted = shortlist.len(), "selected template");
        }
        selected
    }
}
