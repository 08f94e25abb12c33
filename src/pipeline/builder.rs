use crate::config::PipelineConfig;
use crate::error::GroupingError;
use crate::pipeline::defaults::{BipartiteGrouper, WhitespaceTokenizer, WordlistProfanity};
use crate::pipeline::runtime::{GroupingPipeline, GroupingPipelineParts};
use crate::pipeline::stages::{
    DuplicateStage, ForbiddenCharStage, GroupingStage, LengthStage, ProfanityStage,
};
use crate::pipeline::traits::{
    Grouper, ProfanityClassifier, ProfanityWordlist, RecordStage, Tokenizer, WordAligner,
};

pub struct PipelineBuilder {
    config: PipelineConfig,
    tokenizer: Option<Box<dyn Tokenizer>>,
    grouper: Option<Box<dyn Grouper>>,
    word_aligner: Option<Box<dyn WordAligner>>,
    profanity_wordlist: Option<Box<dyn ProfanityWordlist>>,
    profanity_classifier: Option<Box<dyn ProfanityClassifier>>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            grouper: None,
            word_aligner: None,
            profanity_wordlist: None,
            profanity_classifier: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_grouper(mut self, grouper: Box<dyn Grouper>) -> Self {
        self.grouper = Some(grouper);
        self
    }

    /// Align each pair with an external aligner instead of reading an edge
    /// file. The alignment stream is then not opened.
    pub fn with_word_aligner(mut self, word_aligner: Box<dyn WordAligner>) -> Self {
        self.word_aligner = Some(word_aligner);
        self
    }

    /// Overrides any wordlist named by `profanity_wordlist_path`.
    pub fn with_profanity_wordlist(mut self, wordlist: Box<dyn ProfanityWordlist>) -> Self {
        self.profanity_wordlist = Some(wordlist);
        self
    }

    pub fn with_profanity_classifier(mut self, classifier: Box<dyn ProfanityClassifier>) -> Self {
        self.profanity_classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Result<GroupingPipeline, GroupingError> {
        self.config.validate()?;
        let config = self.config;

        let mut stages: Vec<Box<dyn RecordStage>> = Vec::new();
        stages.push(Box::new(LengthStage::new(config.max_chars)));

        if config.profanity_enabled {
            let wordlist = match (self.profanity_wordlist, config.profanity_wordlist_path.as_deref()) {
                (Some(wordlist), _) => Some(wordlist),
                (None, Some(path)) => {
                    let loaded = WordlistProfanity::load(path)?;
                    tracing::debug!(words = loaded.len(), "loaded profanity wordlist");
                    Some(Box::new(loaded) as Box<dyn ProfanityWordlist>)
                }
                (None, None) => None,
            };
            if wordlist.is_none() && self.profanity_classifier.is_none() {
                tracing::warn!("profanity filtering enabled but no wordlist or classifier configured");
            }
            stages.push(Box::new(ProfanityStage::new(
                wordlist,
                self.profanity_classifier,
                config.profanity_threshold,
            )));
        }

        if let Some(forbidden) = config.forbidden_char {
            stages.push(Box::new(ForbiddenCharStage::new(forbidden)));
        }

        if !config.allow_duplicate_source {
            stages.push(Box::new(DuplicateStage::new()));
        }

        let grouping = GroupingStage::new(
            self.grouper.unwrap_or_else(|| Box::new(BipartiteGrouper)),
            self.word_aligner,
            config.preferred_method.clone(),
            config.coverage_policy,
        );
        let uses_word_aligner = grouping.uses_word_aligner();
        stages.push(Box::new(grouping));

        Ok(GroupingPipeline::from_parts(GroupingPipelineParts {
            config,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(WhitespaceTokenizer)),
            stages,
            uses_word_aligner,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_default_stage_order() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default())
            .build()
            .expect("build should succeed");
        assert_eq!(
            pipeline.stage_names(),
            vec!["length", "profanity", "forbidden_char", "duplicate", "grouping"]
        );
    }

    #[test]
    fn builder_omits_disabled_stages() {
        let config = PipelineConfig {
            profanity_enabled: false,
            forbidden_char: None,
            allow_duplicate_source: true,
            ..PipelineConfig::default()
        };
        let pipeline = PipelineBuilder::new(config).build().expect("build");
        assert_eq!(pipeline.stage_names(), vec!["length", "grouping"]);
    }

    #[test]
    fn build_fails_on_invalid_config() {
        let config = PipelineConfig {
            profanity_threshold: 2.0,
            ..PipelineConfig::default()
        };
        assert!(PipelineBuilder::new(config).build().is_err());
    }

    #[test]
    fn build_fails_on_missing_wordlist_path() {
        let config = PipelineConfig {
            profanity_wordlist_path: Some("/nonexistent/words.txt".into()),
            ..PipelineConfig::default()
        };
        let result = PipelineBuilder::new(config).build();
        assert!(matches!(result, Err(GroupingError::MissingInput { .. })));
    }

    #[test]
    fn build_ignores_wordlist_path_when_profanity_disabled() {
        let config = PipelineConfig {
            profanity_enabled: false,
            profanity_wordlist_path: Some("/nonexistent/words.txt".into()),
            ..PipelineConfig::default()
        };
        assert!(PipelineBuilder::new(config).build().is_ok());
    }
}
