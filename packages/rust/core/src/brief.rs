//! The brief: free-text answers describing what is being written about.

use scribe_shared::Result;
use tracing::info;

use crate::operator::Operator;
use crate::profile::Profile;

/// One answer slot in a [`Brief`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BriefField {
    /// Brand name or document topic. Always asked first.
    Subject,
    Offering,
    Audience,
    Differentiators,
    Tone,
    Goal,
}

impl BriefField {
    /// Placeholder name used in section templates (`{subject}`, `{tone}`, ...).
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Offering => "offering",
            Self::Audience => "audience",
            Self::Differentiators => "differentiators",
            Self::Tone => "tone",
            Self::Goal => "goal",
        }
    }

    pub fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "subject" => Some(Self::Subject),
            "offering" => Some(Self::Offering),
            "audience" => Some(Self::Audience),
            "differentiators" => Some(Self::Differentiators),
            "tone" => Some(Self::Tone),
            "goal" => Some(Self::Goal),
            _ => None,
        }
    }
}

/// Immutable once collected. Fields a profile does not ask for stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Brief {
    pub subject: String,
    pub offering: String,
    pub audience: String,
    pub differentiators: String,
    pub tone: String,
    pub goal: String,
}

impl Brief {
    /// A brief carrying only a subject.
    pub fn topic(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: BriefField) -> &str {
        match field {
            BriefField::Subject => &self.subject,
            BriefField::Offering => &self.offering,
            BriefField::Audience => &self.audience,
            BriefField::Differentiators => &self.differentiators,
            BriefField::Tone => &self.tone,
            BriefField::Goal => &self.goal,
        }
    }

    fn set(&mut self, field: BriefField, value: String) {
        let slot = match field {
            BriefField::Subject => &mut self.subject,
            BriefField::Offering => &mut self.offering,
            BriefField::Audience => &mut self.audience,
            BriefField::Differentiators => &mut self.differentiators,
            BriefField::Tone => &mut self.tone,
            BriefField::Goal => &mut self.goal,
        };
        *slot = value;
    }
}

/// Ask the profile's brief questions in order.
///
/// Returns `Ok(None)` when the subject is left empty: the session ends
/// before any work starts.
pub async fn collect_brief<O: Operator>(profile: Profile, operator: &mut O) -> Result<Option<Brief>> {
    let mut brief = Brief::default();

    for question in profile.questions() {
        let answer = operator.ask(question.prompt).await?;
        let answer = answer.trim().to_string();

        if question.field == BriefField::Subject && answer.is_empty() {
            operator.notice("No subject entered. Exiting.");
            return Ok(None);
        }
        brief.set(question.field, answer);
    }

    info!(%profile, subject = %brief.subject, "brief collected");
    Ok(Some(brief))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOperator;

    #[tokio::test]
    async fn website_copy_brief_fills_every_field() {
        let mut operator = ScriptedOperator::new([
            "Acme",
            "Cloud backups",
            "Small clinics",
            "Encrypted, local support",
            "Friendly",
            "Generate leads",
        ]);

        let brief = collect_brief(Profile::WebsiteCopy, &mut operator)
            .await
            .unwrap()
            .expect("brief");

        assert_eq!(brief.subject, "Acme");
        assert_eq!(brief.offering, "Cloud backups");
        assert_eq!(brief.audience, "Small clinics");
        assert_eq!(brief.differentiators, "Encrypted, local support");
        assert_eq!(brief.tone, "Friendly");
        assert_eq!(brief.goal, "Generate leads");
        assert_eq!(operator.questions.len(), 6);
    }

    #[tokio::test]
    async fn manual_brief_asks_only_topic() {
        let mut operator = ScriptedOperator::new(["  Edge computing "]);

        let brief = collect_brief(Profile::Manual, &mut operator).await.unwrap();

        assert_eq!(brief, Some(Brief::topic("Edge computing")));
    }

    #[tokio::test]
    async fn empty_subject_ends_session() {
        let mut operator = ScriptedOperator::new(["   "]);

        let brief = collect_brief(Profile::WebsiteCopy, &mut operator).await.unwrap();

        assert!(brief.is_none());
        assert_eq!(operator.questions.len(), 1);
        assert_eq!(operator.notices.len(), 1);
    }

    #[test]
    fn placeholders_round_trip() {
        for field in [
            BriefField::Subject,
            BriefField::Offering,
            BriefField::Audience,
            BriefField::Differentiators,
            BriefField::Tone,
            BriefField::Goal,
        ] {
            assert_eq!(BriefField::from_placeholder(field.placeholder()), Some(field));
        }
        assert_eq!(BriefField::from_placeholder("sources"), None);
    }
}
