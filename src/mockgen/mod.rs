//! Mock data generator
//!
//! Seeds a running forum backend with synthetic users and posts through its
//! public HTTP API, optionally asking a text-generation service for bios and
//! post bodies. Calls are spaced by a fixed delay and never retried; a failed
//! step is logged and skipped.

pub mod content;
pub mod forum;
pub mod llm;

use crate::logger;
use anyhow::Context;
use forum::{Board, ForumClient, NewPost, NewUser};
use llm::TextGenerator;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct MockgenConfig {
    pub forum: ForumConfig,
    pub llm: LlmConfig,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForumConfig {
    pub base_url: String,
    /// Token used to list boards
    pub admin_token: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub enabled: bool,
    pub base_url: String,
    pub max_new_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    pub users: usize,
    pub posts: usize,
    /// Shared password for every generated account
    pub password: String,
    pub delay_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MockgenConfig {
    /// Optional `mockgen.toml`, then `MOCKGEN_*` environment overrides
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MOCKGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("forum.base_url", "http://localhost:8989")?
            .set_default("forum.admin_token", "")?
            .set_default("forum.request_timeout_secs", 30)?
            .set_default("llm.enabled", false)?
            .set_default("llm.base_url", "http://localhost:8000")?
            .set_default("llm.max_new_tokens", 50)?
            .set_default("run.users", 100)?
            .set_default("run.posts", 100)?
            .set_default("run.password", "123456")?
            .set_default("run.delay_ms", 500)?
            .build()?
            .try_deserialize()
    }
}

/// Account created during this run
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub username: String,
    pub password: String,
}

/// Counts reported at the end of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub users_created: usize,
    pub posts_created: usize,
    pub failures: usize,
}

pub struct Generator {
    forum: ForumClient,
    llm: Option<TextGenerator>,
    settings: MockgenConfig,
    rng: StdRng,
}

impl Generator {
    pub fn new(settings: MockgenConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.forum.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        let llm = settings
            .llm
            .enabled
            .then(|| TextGenerator::new(&settings.llm.base_url, settings.llm.max_new_tokens, client.clone()));
        let rng = settings
            .run
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Ok(Self {
            forum: ForumClient::new(&settings.forum.base_url, client),
            llm,
            settings,
            rng,
        })
    }

    async fn pause(&self) {
        tokio::time::sleep(Duration::from_millis(self.settings.run.delay_ms)).await;
    }

    /// Generated text when the service is enabled and answers, template otherwise
    async fn generated_or(&self, prompt: String, fallback: String) -> String {
        let Some(llm) = &self.llm else {
            return fallback;
        };
        match llm.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                logger::log_warning(&format!("[mockgen] Text generation failed, using template: {e:#}"));
                fallback
            }
        }
    }

    pub async fn generate_users(&mut self, count: usize, summary: &mut Summary) -> Vec<CreatedUser> {
        logger::log_info(&format!("[mockgen] Creating {count} users"));
        let mut users = Vec::with_capacity(count);

        for i in 1..=count {
            let username = content::username(&mut self.rng);
            let prompt = content::bio_prompt(&mut self.rng);
            let template = content::bio(&mut self.rng);
            let bio = self.generated_or(prompt, template).await;
            let user = NewUser {
                email: content::email(&mut self.rng, &username),
                avatar_url: content::avatar_url(&mut self.rng),
                password: self.settings.run.password.clone(),
                username,
                bio,
            };

            match self.forum.register(&user).await {
                Ok(()) => {
                    logger::log_info(&format!("[mockgen] User {i}/{count} created: {}", user.username));
                    summary.users_created += 1;
                    users.push(CreatedUser {
                        username: user.username,
                        password: user.password,
                    });
                }
                Err(e) => {
                    logger::log_warning(&format!("[mockgen] User {i}/{count} failed: {e:#}"));
                    summary.failures += 1;
                }
            }
            self.pause().await;
        }
        users
    }

    pub async fn generate_posts(&mut self, users: &[CreatedUser], count: usize, summary: &mut Summary) {
        logger::log_info(&format!("[mockgen] Creating {count} posts"));
        let boards = match self.forum.boards(&self.settings.forum.admin_token).await {
            Ok(boards) if !boards.is_empty() => boards,
            Ok(_) => {
                logger::log_error("[mockgen] No boards available, skipping posts");
                return;
            }
            Err(e) => {
                logger::log_error(&format!("[mockgen] Failed to list boards: {e:#}"));
                return;
            }
        };

        for i in 1..=count {
            match self.create_one_post(users, &boards).await {
                Ok(()) => {
                    logger::log_info(&format!("[mockgen] Post {i}/{count} created"));
                    summary.posts_created += 1;
                }
                Err(e) => {
                    logger::log_warning(&format!("[mockgen] Post {i}/{count} failed: {e:#}"));
                    summary.failures += 1;
                }
            }
            self.pause().await;
        }
    }

    async fn create_one_post(&mut self, users: &[CreatedUser], boards: &[Board]) -> anyhow::Result<()> {
        let user = users
            .choose(&mut self.rng)
            .ok_or_else(|| anyhow::anyhow!("no users to post as"))?;
        let board_id = boards
            .choose(&mut self.rng)
            .map(|b| b.id)
            .ok_or_else(|| anyhow::anyhow!("no boards"))?;

        let token = self.forum.login(&user.username, &user.password).await?;
        let prompt = content::post_prompt(&mut self.rng);
        let template = content::post_content(&mut self.rng);
        let post = NewPost {
            title: content::title(&mut self.rng),
            content: self.generated_or(prompt, template).await,
            board_id,
            tags: content::tags(&mut self.rng),
        };
        self.forum.create_post(&token, &post).await
    }

    /// Users first, then posts by random users
    pub async fn run(&mut self) -> Summary {
        let mut summary = Summary::default();
        let users = self.generate_users(self.settings.run.users, &mut summary).await;
        if users.is_empty() {
            logger::log_warning("[mockgen] No users created, skipping posts");
        } else {
            self.generate_posts(&users, self.settings.run.posts, &mut summary).await;
        }
        logger::log_info(&format!(
            "[mockgen] Done: {} users, {} posts, {} failures",
            summary.users_created, summary.posts_created, summary.failures
        ));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_script() {
        let settings = MockgenConfig::load_from("does-not-exist/mockgen").unwrap();
        assert_eq!(settings.forum.base_url, "http://localhost:8989");
        assert_eq!(settings.run.users, 100);
        assert_eq!(settings.run.posts, 100);
        assert_eq!(settings.run.password, "123456");
        assert_eq!(settings.run.delay_ms, 500);
        assert!(!settings.llm.enabled);
    }

    #[tokio::test]
    async fn test_unreachable_forum_counts_failures_and_skips_posts() {
        let mut settings = MockgenConfig::load_from("does-not-exist/mockgen").unwrap();
        settings.forum.base_url = "http://127.0.0.1:1".into();
        settings.forum.request_timeout_secs = 2;
        settings.run.users = 2;
        settings.run.delay_ms = 0;
        settings.run.seed = Some(11);

        let summary = Generator::new(settings).unwrap().run().await;
        assert_eq!(
            summary,
            Summary {
                users_created: 0,
                posts_created: 0,
                failures: 2
            }
        );
    }
}
