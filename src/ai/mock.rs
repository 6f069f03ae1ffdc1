use super::{ImageGenerationService, IdeaService};
use crate::models::{ArtIdea, FourPillarChart, ARTWORK_COUNT};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Data URI of a 1x1 PNG, returned by [`MockImageClient`] by default.
pub const MOCK_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVQImWP4z8AAAAMBAQDJ/pLvAAAAAElFTkSuQmCC";

/// Scripted idea client. Each call consumes the next scripted response,
/// cycling when the script runs out; with no script it answers with three
/// ideas built from the chart.
#[derive(Clone)]
pub struct MockIdeaClient {
    responses: Arc<Mutex<Vec<Option<Vec<ArtIdea>>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockIdeaClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_ideas(self, ideas: Vec<ArtIdea>) -> Self {
        self.responses.lock().unwrap().push(Some(ideas));
        self
    }

    pub fn with_failure(self) -> Self {
        self.responses.lock().unwrap().push(None);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn default_ideas(chart: &FourPillarChart) -> Vec<ArtIdea> {
        let styles = [
            "traditional Chinese ink wash",
            "impressionistic oil painting",
            "modern abstract watercolor",
        ];
        styles
            .iter()
            .take(ARTWORK_COUNT)
            .enumerate()
            .map(|(i, style)| ArtIdea {
                description: format!(
                    "Option {} balances the {} year and {} day pillars.",
                    i + 1,
                    chart.year,
                    chart.day
                ),
                image_prompt: format!("A {} of mountains and flowing water", style),
            })
            .collect()
    }
}

impl Default for MockIdeaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdeaService for MockIdeaClient {
    async fn generate_ideas(&self, chart: &FourPillarChart) -> Result<Vec<ArtIdea>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(Self::default_ideas(chart));
        }

        let index = (*count - 1) % responses.len();
        responses[index]
            .clone()
            .ok_or_else(|| Error::AiProvider("Mock idea generation failure".to_string()))
    }
}

/// Outcome of one mocked image call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockImageOutcome {
    Image(String),
    NoMedia,
    Fail(String),
}

/// Image client whose outcome is chosen by the prompt text.
///
/// Rules are matched in insertion order by substring; prompts matching no
/// rule get the default outcome.
#[derive(Clone)]
pub struct MockImageClient {
    rules: Arc<Mutex<Vec<(String, MockImageOutcome)>>>,
    default_outcome: MockImageOutcome,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Mutex::new(Vec::new())),
            default_outcome: MockImageOutcome::Image(MOCK_IMAGE_DATA_URI.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_default_outcome(mut self, outcome: MockImageOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }

    pub fn with_outcome_for(self, prompt_fragment: &str, outcome: MockImageOutcome) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((prompt_fragment.to_string(), outcome));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let outcome = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| self.default_outcome.clone());

        match outcome {
            MockImageOutcome::Image(uri) => Ok(Some(uri)),
            MockImageOutcome::NoMedia => Ok(None),
            MockImageOutcome::Fail(reason) => Err(Error::AiProvider(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> FourPillarChart {
        FourPillarChart {
            year: "甲子".to_string(),
            month: "丙寅".to_string(),
            day: "戊辰".to_string(),
            hour: "庚申".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_idea_client_default_ideas() {
        let client = MockIdeaClient::new();
        let ideas = client.generate_ideas(&chart()).await.unwrap();

        assert_eq!(ideas.len(), ARTWORK_COUNT);
        assert!(ideas[0].description.contains("甲子"));
        assert_eq!(client.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_idea_client_cycles_script() {
        let idea = ArtIdea {
            description: "d".to_string(),
            image_prompt: "p".to_string(),
        };
        let client = MockIdeaClient::new()
            .with_ideas(vec![idea.clone()])
            .with_failure();

        assert_eq!(client.generate_ideas(&chart()).await.unwrap(), vec![idea.clone()]);
        assert!(client.generate_ideas(&chart()).await.is_err());
        assert_eq!(client.generate_ideas(&chart()).await.unwrap(), vec![idea]);
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_image_client_matches_rules_by_prompt() {
        let client = MockImageClient::new()
            .with_outcome_for("crane", MockImageOutcome::NoMedia)
            .with_outcome_for("dragon", MockImageOutcome::Fail("quota".to_string()));

        assert_eq!(
            client.generate_image("a koi pond").await.unwrap().as_deref(),
            Some(MOCK_IMAGE_DATA_URI)
        );
        assert_eq!(client.generate_image("two cranes").await.unwrap(), None);
        assert!(client.generate_image("a red dragon").await.is_err());
        assert_eq!(client.get_call_count(), 3);
        assert_eq!(client.get_prompts()[1], "two cranes");
    }
}
