// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Additive model scoring.
//!
//! Every factor adds points only when its condition holds; the highest total
//! wins and ties go to the model registered first. Scoring reads nothing but
//! its arguments and the weight table, so identical inputs always pick the
//! same model.

use std::collections::HashMap;

use switchyard_config::model::SelectorConfig;
use switchyard_core::{
    Complexity, ModelDescriptor, QualityClass, SpeedClass, TaskContext, Urgency, UsageStats,
};
use tracing::debug;

/// Total score of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelScore {
    pub model: String,
    pub score: i32,
}

/// Scores registry entries against a [`TaskContext`].
#[derive(Debug, Clone)]
pub struct ModelSelector {
    config: SelectorConfig,
}

impl ModelSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Picks the best model for `context`, or `None` when `models` is empty.
    ///
    /// `models` must be in registration order; the first of several equal
    /// scores wins.
    pub fn select_optimal_model(
        &self,
        context: &TaskContext,
        models: &[ModelDescriptor],
        usage: &HashMap<String, UsageStats>,
    ) -> Option<String> {
        let mut best: Option<ModelScore> = None;
        for candidate in self.rank(context, models, usage) {
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        if let Some(ref chosen) = best {
            debug!(
                model = chosen.model.as_str(),
                score = chosen.score,
                task_type = %context.task_type,
                "model selected"
            );
        }
        best.map(|b| b.model)
    }

    /// Scores every model, preserving input order.
    pub fn rank(
        &self,
        context: &TaskContext,
        models: &[ModelDescriptor],
        usage: &HashMap<String, UsageStats>,
    ) -> Vec<ModelScore> {
        models
            .iter()
            .map(|model| ModelScore {
                model: model.name.clone(),
                score: self.score(context, model, usage.get(&model.name)),
            })
            .collect()
    }

    /// Sum of every factor that applies to `model`.
    pub fn score(
        &self,
        context: &TaskContext,
        model: &ModelDescriptor,
        usage: Option<&UsageStats>,
    ) -> i32 {
        let cfg = &self.config;
        let mut score = 0;

        score += cfg
            .affinity
            .iter()
            .filter(|rule| rule.task_type == context.task_type && model.has_capability(&rule.tag))
            .map(|rule| rule.points)
            .sum::<i32>();

        match context.complexity {
            Complexity::Simple => {
                if model.has_capability("cost-effective") {
                    score += cfg.simple_cost_bonus;
                }
                if model.has_capability("speed") {
                    score += cfg.simple_speed_bonus;
                }
            }
            Complexity::Complex if model.quality == QualityClass::High => {
                score += cfg.complex_quality_bonus;
            }
            _ => {}
        }

        match context.urgency {
            Urgency::High if model.speed == SpeedClass::Fast => score += cfg.urgency_speed_bonus,
            Urgency::Low if model.cost_per_token <= cfg.low_cost_threshold => {
                score += cfg.urgency_cost_bonus
            }
            _ => {}
        }

        if context.wants_non_default_language() && model.has_capability("multilingual") {
            score += cfg.language_bonus;
        }

        if let Some(pref) = context.preferred_model.as_deref().map(str::trim)
            && !pref.is_empty()
            && model.name.to_lowercase().contains(&pref.to_lowercase())
        {
            score += cfg.user_preference_bonus;
        }

        if let Some(stats) = usage {
            if stats.requests > 0 && stats.avg_latency_ms < cfg.fast_latency_ms {
                score += cfg.latency_bonus;
            }
            if stats.requests > cfg.experience_requests {
                score += cfg.experience_bonus;
            }
        }

        if cfg.preferred_models.iter().any(|p| p == &model.name) {
            score += cfg.preferred_bonus;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use switchyard_config::model::AffinityRule;
    use switchyard_core::TaskType;

    use super::*;

    fn model(
        name: &str,
        caps: &[&str],
        cost: f64,
        speed: SpeedClass,
        quality: QualityClass,
    ) -> ModelDescriptor {
        ModelDescriptor {
            name: name.to_string(),
            provider: "mock".to_string(),
            capabilities: caps.iter().map(|c| c.to_string()).collect(),
            max_tokens: 4096,
            cost_per_token: cost,
            speed,
            quality,
        }
    }

    fn catalog() -> Vec<ModelDescriptor> {
        vec![
            model("coder", &["coding", "reasoning"], 0.00003, SpeedClass::Medium, QualityClass::High),
            model("quick", &["speed", "cost-effective", "general"], 0.000002, SpeedClass::Fast, QualityClass::Medium),
            model("poet", &["creative"], 0.00007, SpeedClass::Slow, QualityClass::High),
            model("linguist", &["multilingual", "reasoning"], 0.0000005, SpeedClass::Medium, QualityClass::Medium),
        ]
    }

    fn selector() -> ModelSelector {
        ModelSelector::new(SelectorConfig::default())
    }

    fn pick(ctx: &TaskContext) -> Option<String> {
        selector().select_optimal_model(ctx, &catalog(), &HashMap::new())
    }

    #[test]
    fn coding_task_prefers_coding_model() {
        let ctx = TaskContext::new(TaskType::Coding);
        assert_eq!(pick(&ctx).as_deref(), Some("coder"));
    }

    #[test]
    fn creative_task_prefers_creative_model() {
        let ctx = TaskContext::new(TaskType::Creative);
        assert_eq!(pick(&ctx).as_deref(), Some("poet"));
    }

    #[test]
    fn simple_urgent_conversation_prefers_fast_cheap_model() {
        let ctx = TaskContext::new(TaskType::Conversational)
            .with_complexity(Complexity::Simple)
            .with_urgency(Urgency::High);
        assert_eq!(pick(&ctx).as_deref(), Some("quick"));
    }

    #[test]
    fn foreign_language_translation_prefers_multilingual_model() {
        let ctx = TaskContext::new(TaskType::Translation).with_language("ja");
        assert_eq!(pick(&ctx).as_deref(), Some("linguist"));
    }

    #[test]
    fn user_preference_is_case_insensitive_substring() {
        let s = selector();
        let ctx = TaskContext::new(TaskType::Conversational).with_preferred_model("POE");
        let models = catalog();
        let with = s.score(&ctx, &models[2], None);
        let without = s.score(&TaskContext::new(TaskType::Conversational), &models[2], None);
        assert_eq!(with - without, SelectorConfig::default().user_preference_bonus);
    }

    #[test]
    fn complex_and_low_urgency_bonuses_apply() {
        let s = selector();
        let cfg = SelectorConfig::default();
        let models = catalog();
        let base = TaskContext::new(TaskType::System);

        let complex = base.clone().with_complexity(Complexity::Complex);
        assert_eq!(
            s.score(&complex, &models[0], None) - s.score(&base, &models[0], None),
            cfg.complex_quality_bonus
        );

        let relaxed = base.clone().with_urgency(Urgency::Low);
        assert_eq!(
            s.score(&relaxed, &models[3], None) - s.score(&base, &models[3], None),
            cfg.urgency_cost_bonus
        );
        assert_eq!(s.score(&relaxed, &models[2], None), s.score(&base, &models[2], None));
    }

    #[test]
    fn usage_history_bonuses() {
        let s = selector();
        let cfg = SelectorConfig::default();
        let ctx = TaskContext::new(TaskType::System);
        let m = &catalog()[2];

        let fresh = UsageStats::default();
        assert_eq!(s.score(&ctx, m, Some(&fresh)), s.score(&ctx, m, None));

        let fast = UsageStats {
            requests: 1,
            avg_latency_ms: 100.0,
            ..Default::default()
        };
        assert_eq!(s.score(&ctx, m, Some(&fast)), cfg.latency_bonus);

        let seasoned = UsageStats {
            requests: cfg.experience_requests + 1,
            avg_latency_ms: cfg.fast_latency_ms * 10.0,
            ..Default::default()
        };
        assert_eq!(s.score(&ctx, m, Some(&seasoned)), cfg.experience_bonus);
    }

    #[test]
    fn preferred_list_bonus() {
        let config = SelectorConfig {
            preferred_models: vec!["poet".to_string()],
            ..Default::default()
        };
        let s = ModelSelector::new(config.clone());
        let ctx = TaskContext::new(TaskType::System);
        assert_eq!(s.score(&ctx, &catalog()[2], None), config.preferred_bonus);
    }

    #[test]
    fn weight_table_is_configurable() {
        let config = SelectorConfig {
            affinity: vec![AffinityRule {
                task_type: TaskType::Coding,
                tag: "creative".to_string(),
                points: 100,
            }],
            ..Default::default()
        };
        let s = ModelSelector::new(config);
        let ctx = TaskContext::new(TaskType::Coding);
        assert_eq!(
            s.select_optimal_model(&ctx, &catalog(), &HashMap::new()).as_deref(),
            Some("poet")
        );
    }

    #[test]
    fn ties_go_to_first_registered() {
        let models = vec![
            model("first", &["general"], 0.1, SpeedClass::Medium, QualityClass::Medium),
            model("second", &["general"], 0.1, SpeedClass::Medium, QualityClass::Medium),
        ];
        let ctx = TaskContext::new(TaskType::Conversational);
        let s = selector();
        assert_eq!(
            s.select_optimal_model(&ctx, &models, &HashMap::new()).as_deref(),
            Some("first")
        );
        let reversed: Vec<_> = models.into_iter().rev().collect();
        assert_eq!(
            s.select_optimal_model(&ctx, &reversed, &HashMap::new()).as_deref(),
            Some("second")
        );
    }

    #[test]
    fn empty_registry_selects_nothing() {
        let ctx = TaskContext::new(TaskType::Coding);
        assert_eq!(selector().select_optimal_model(&ctx, &[], &HashMap::new()), None);
    }

    fn task_type_strategy() -> impl Strategy<Value = TaskType> {
        prop_oneof![
            Just(TaskType::Coding),
            Just(TaskType::Creative),
            Just(TaskType::Analytical),
            Just(TaskType::Conversational),
            Just(TaskType::System),
            Just(TaskType::Translation),
            Just(TaskType::Summarization),
        ]
    }

    fn complexity_strategy() -> impl Strategy<Value = Complexity> {
        prop_oneof![
            Just(Complexity::Simple),
            Just(Complexity::Medium),
            Just(Complexity::Complex)
        ]
    }

    fn urgency_strategy() -> impl Strategy<Value = Urgency> {
        prop_oneof![Just(Urgency::Low), Just(Urgency::Medium), Just(Urgency::High)]
    }

    proptest! {
        #[test]
        fn selection_is_deterministic(
            task_type in task_type_strategy(),
            complexity in complexity_strategy(),
            urgency in urgency_strategy(),
            language in prop::option::of("[a-z]{2}"),
            requests in prop::collection::vec(0u64..30, 4),
        ) {
            let mut ctx = TaskContext::new(task_type)
                .with_complexity(complexity)
                .with_urgency(urgency);
            if let Some(lang) = language {
                ctx = ctx.with_language(lang);
            }
            let models = catalog();
            let usage: HashMap<String, UsageStats> = models
                .iter()
                .zip(&requests)
                .map(|(m, &r)| (m.name.clone(), UsageStats { requests: r, avg_latency_ms: 500.0, ..Default::default() }))
                .collect();

            let s = selector();
            let first = s.select_optimal_model(&ctx, &models, &usage);
            let second = s.select_optimal_model(&ctx, &models, &usage);
            prop_assert!(first.is_some());
            prop_assert_eq!(first.clone(), second);

            let best = s.rank(&ctx, &models, &usage).into_iter().map(|r| r.score).max();
            let chosen = first.unwrap();
            let chosen_score = s.rank(&ctx, &models, &usage)
                .into_iter()
                .find(|r| r.model == chosen)
                .map(|r| r.score);
            prop_assert_eq!(chosen_score, best);
        }
    }
}
