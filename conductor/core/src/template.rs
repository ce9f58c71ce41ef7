//! Copy Templates
//!
//! Builds the three sections of a pitch from the form values. Field values
//! are inserted verbatim. The body keeps the "solvign" spelling that the
//! shipped copy has always used.

use serde::{Deserialize, Serialize};

use crate::emission::Channel;
use crate::input::PitchInput;

/// The three composed sections of a pitch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchDraft {
    /// One-line headline
    pub headline: String,
    /// Supporting subhead
    pub subhead: String,
    /// Three-sentence body
    pub body: String,
}

impl PitchDraft {
    /// Expand the templates for the given input
    #[must_use]
    pub fn compose(input: &PitchInput) -> Self {
        let PitchInput {
            company,
            problem,
            solution,
            ask,
            ..
        } = input;
        let tone = input.effective_tone().adjective();

        let headline = format!("{company}: a {tone} path to solve {problem}");
        let subhead = format!("we deal with {problem} using {solution}. the ask: {ask}.");
        let body = [
            format!("at {company}, we are focused on solvign {problem} with tone: {tone}."),
            format!("using solution: {solution}."),
            format!("today, we are asking for {ask} to speed up execution."),
        ]
        .join(" ");

        Self {
            headline,
            subhead,
            body,
        }
    }

    /// Text for one channel
    #[must_use]
    pub fn section(&self, channel: Channel) -> &str {
        match channel {
            Channel::Headline => &self.headline,
            Channel::Subhead => &self.subhead,
            Channel::Body => &self.body,
        }
    }

    /// Mutable text for one channel
    pub fn section_mut(&mut self, channel: Channel) -> &mut String {
        match channel {
            Channel::Headline => &mut self.headline,
            Channel::Subhead => &mut self.subhead,
            Channel::Body => &mut self.body,
        }
    }

    /// True when every section is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|c| self.section(*c).is_empty())
    }

    /// Empty every section
    pub fn clear(&mut self) {
        for channel in Channel::ALL {
            self.section_mut(channel).clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Field;
    use pretty_assertions::assert_eq;

    fn acme(tone: &str) -> PitchInput {
        PitchInput::default()
            .with(Field::Company, "Acme")
            .with(Field::Problem, "slow onboarding")
            .with(Field::Solution, "a guided wizard")
            .with(Field::Ask, "$2M seed")
            .with(Field::Tone, tone)
    }

    #[test]
    fn test_compose_friendly_example() {
        let draft = PitchDraft::compose(&acme("friendly"));
        assert_eq!(draft.headline, "Acme: a friendly path to solve slow onboarding");
        assert_eq!(
            draft.subhead,
            "we deal with slow onboarding using a guided wizard. the ask: $2M seed."
        );
        assert_eq!(
            draft.body,
            "at Acme, we are focused on solvign slow onboarding with tone: friendly. \
             using solution: a guided wizard. \
             today, we are asking for $2M seed to speed up execution."
        );
    }

    #[test]
    fn test_unknown_tone_reads_as_confident() {
        let odd = PitchDraft::compose(&acme("whimsical"));
        let confident = PitchDraft::compose(&acme("confident"));
        assert_eq!(odd.headline, confident.headline);
        assert_eq!(odd.body, confident.body);
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let input = acme("casual").with(Field::Company, " Acme ");
        let draft = PitchDraft::compose(&input);
        assert!(draft.headline.starts_with(" Acme : a casual"));
    }

    #[test]
    fn test_section_accessors() {
        let mut draft = PitchDraft::compose(&acme("technical"));
        assert_eq!(draft.section(Channel::Headline), draft.headline);
        draft.section_mut(Channel::Body).push('!');
        assert!(draft.body.ends_with("execution.!"));
        draft.clear();
        assert!(draft.is_empty());
    }
}
