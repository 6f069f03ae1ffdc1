//! Placeholder photo URLs substituted when image generation fails.
//!
//! URLs follow the `<base>/seed/<seed>/400/300` scheme of the placeholder
//! photo host. The seed always carries the item index.

use crate::Error;
use rand::Rng;
use std::str::FromStr;

const PROMPT_SEED_CHARS: usize = 15;
const PLACEHOLDER_WIDTH: u32 = 400;
const PLACEHOLDER_HEIGHT: u32 = 300;

/// How seeds for failed generation calls are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Failed calls get a random nonce, so each failure shows a new photo.
    #[default]
    Nonce,
    /// Failed calls are seeded from the prompt only, so retries are stable.
    Content,
}

impl FromStr for PlaceholderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nonce" | "random" => Ok(Self::Nonce),
            "content" | "reproducible" => Ok(Self::Content),
            other => Err(Error::Config(format!(
                "PLACEHOLDER_SEED must be 'nonce' or 'content', got '{}'",
                other
            ))),
        }
    }
}

/// Why a placeholder is needed for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderCause {
    MissingMedia,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PlaceholderImages {
    base_url: String,
    policy: PlaceholderPolicy,
}

impl PlaceholderImages {
    pub fn new(base_url: String, policy: PlaceholderPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        }
    }

    pub fn url_for<R: Rng + ?Sized>(
        &self,
        cause: PlaceholderCause,
        prompt: &str,
        index: usize,
        rng: &mut R,
    ) -> String {
        let seed = match (cause, self.policy) {
            (PlaceholderCause::MissingMedia, _) => format!("{}{}", prompt_fragment(prompt), index),
            (PlaceholderCause::Failed, PlaceholderPolicy::Nonce) => {
                format!("error{}{}", index, rng.gen::<u64>())
            }
            (PlaceholderCause::Failed, PlaceholderPolicy::Content) => {
                format!("error{}{}", index, prompt_fragment(prompt))
            }
        };

        format!(
            "{}/seed/{}/{}/{}",
            self.base_url, seed, PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT
        )
    }
}

fn prompt_fragment(prompt: &str) -> String {
    let head: String = prompt.chars().take(PROMPT_SEED_CHARS).collect();
    urlencoding::encode(&head).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn images(policy: PlaceholderPolicy) -> PlaceholderImages {
        PlaceholderImages::new("https://picsum.photos/".to_string(), policy)
    }

    #[test]
    fn test_missing_media_seed_uses_encoded_prompt_prefix_and_index() {
        let mut rng = StdRng::seed_from_u64(7);
        let url = images(PlaceholderPolicy::Nonce).url_for(
            PlaceholderCause::MissingMedia,
            "A vibrant oil painting of mountains",
            2,
            &mut rng,
        );
        assert_eq!(
            url,
            "https://picsum.photos/seed/A%20vibrant%20oil%20p2/400/300"
        );
    }

    #[test]
    fn test_failed_seed_with_nonce_policy_varies() {
        let placeholders = images(PlaceholderPolicy::Nonce);
        let mut rng = StdRng::seed_from_u64(1);
        let first = placeholders.url_for(PlaceholderCause::Failed, "prompt", 1, &mut rng);
        let second = placeholders.url_for(PlaceholderCause::Failed, "prompt", 1, &mut rng);

        assert!(first.starts_with("https://picsum.photos/seed/error1"));
        assert!(first.ends_with("/400/300"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_failed_seed_with_content_policy_is_stable() {
        let placeholders = images(PlaceholderPolicy::Content);
        let mut rng = StdRng::seed_from_u64(1);
        let first = placeholders.url_for(PlaceholderCause::Failed, "ink wash crane", 0, &mut rng);
        let second = placeholders.url_for(PlaceholderCause::Failed, "ink wash crane", 0, &mut rng);

        assert_eq!(first, second);
        assert_eq!(
            first,
            "https://picsum.photos/seed/error0ink%20wash%20crane/400/300"
        );
    }

    #[test]
    fn test_prompt_fragment_counts_characters_not_bytes() {
        assert_eq!(prompt_fragment("甲子丙寅"), urlencoding::encode("甲子丙寅"));
        assert_eq!(prompt_fragment("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmno");
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("nonce".parse::<PlaceholderPolicy>().unwrap(), PlaceholderPolicy::Nonce);
        assert_eq!(
            " Content ".parse::<PlaceholderPolicy>().unwrap(),
            PlaceholderPolicy::Content
        );
        assert!("sometimes".parse::<PlaceholderPolicy>().is_err());
    }
}
