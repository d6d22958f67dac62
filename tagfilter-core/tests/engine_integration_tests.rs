// tagfilter-core/tests/engine_integration_tests.rs
use anyhow::Result;
use test_log::test;

use tagfilter_core::{
    create_engine, AnyFilterRule, EngineKind, EngineOptions, FilterEngine, FilterRule,
    GroupFilterRule, MemoryEfficientFilterEngine, OptimizedTagFilterEngine, PatternCache,
    TagFilterEngine, TagFilterError,
};

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn options() -> EngineOptions {
    EngineOptions::default().with_pattern_cache(PatternCache::new(64))
}

fn mixed_rules() -> Vec<AnyFilterRule> {
    vec![
        GroupFilterRule::new(["steam", "sweat", "blush"])
            .unwrap()
            .with_priority(100)
            .into(),
        FilterRule::plain_keyword("nsfw").with_priority(80).into(),
        FilterRule::regex(r"\b(nude|naked)\b").with_priority(70).into(),
        FilterRule::wildcard("*_hair").with_priority(50).into(),
        FilterRule::replace_capture("(.*)_old||$1_new").with_priority(30).into(),
        FilterRule::replace("bad||good").with_priority(10).into(),
    ]
}

#[test]
fn test_keyword_and_wildcard_scenario() -> Result<()> {
    let rules: Vec<AnyFilterRule> = vec![
        FilterRule::plain_keyword("nsfw").with_priority(10).into(),
        FilterRule::wildcard("*_hair").with_priority(5).into(),
    ];
    let engine = create_engine(rules, "standard", options())?;
    assert_eq!(
        engine.filter_tags(&tags(&["nsfw", "red_hair", "smile", "blue_hair"])),
        tags(&["smile"])
    );

    let engine = create_engine(mixed_rules(), "standard", options())?;
    assert_eq!(
        engine.filter_tags(&tags(&["red_hair", "nsfw_content", "smile"])),
        tags(&["smile"])
    );
    Ok(())
}

#[test]
fn test_group_boundary_scenario() -> Result<()> {
    let engine = create_engine(mixed_rules(), "standard", options())?;
    assert_eq!(
        engine.filter_tags(&tags(&["steam", "hot", "other"])),
        tags(&["steam", "hot", "other"])
    );
    assert_eq!(
        engine.filter_tags(&tags(&["steam", "sweat", "blush", "other"])),
        tags(&["other"])
    );
    Ok(())
}

#[test]
fn test_replacements_scenario() -> Result<()> {
    let engine = create_engine(mixed_rules(), "standard", options())?;
    assert_eq!(
        engine.filter_tags(&tags(&["bad", "thing_old", "neutral"])),
        tags(&["good", "thing_new", "neutral"])
    );
    Ok(())
}

#[test]
fn test_all_engines_agree_on_lists() -> Result<()> {
    let input = tags(&[
        "steam", "sweat", "blush", "nsfw_art", "semi nude", "red_hair", "bad", "cat_old", "smile",
    ]);
    let expected = tags(&["good", "cat_new", "smile"]);
    for kind in ["standard", "optimized", "memory_efficient"] {
        let engine = create_engine(mixed_rules(), kind, options())?;
        assert_eq!(engine.filter_tags(&input), expected, "engine {}", kind);
    }
    Ok(())
}

#[test]
fn test_empty_input_and_empty_engine() -> Result<()> {
    let engine = create_engine(mixed_rules(), "optimized", options())?;
    assert!(engine.filter_tags(&[]).is_empty());

    let empty = create_engine(Vec::new(), "standard", options())?;
    let input = tags(&["a", "b"]);
    assert_eq!(empty.filter_tags(&input), input);
    Ok(())
}

#[test]
fn test_removal_only_engines_are_idempotent() -> Result<()> {
    let rules: Vec<AnyFilterRule> = vec![
        FilterRule::plain_keyword("nsfw").into(),
        FilterRule::wildcard("*_eyes").into(),
        GroupFilterRule::new(["a", "b"])?.into(),
    ];
    let engine = TagFilterEngine::with_options(rules, options())?;
    let input = tags(&["nsfw", "blue_eyes", "ab", "b", "dog"]);
    let once = engine.filter_tags(&input);
    assert_eq!(engine.filter_tags(&once), once);
    assert!(once.iter().all(|t| input.contains(t)));
    Ok(())
}

#[test]
fn test_output_preserves_input_order() -> Result<()> {
    let engine = TagFilterEngine::with_options(
        vec![FilterRule::plain_keyword("x").into()],
        options(),
    )?;
    assert_eq!(
        engine.filter_tags(&tags(&["d", "x1", "c", "b", "x2", "a"])),
        tags(&["d", "c", "b", "a"])
    );
    Ok(())
}

#[test]
fn test_stability_of_equal_priorities() -> Result<()> {
    // Two replacements of equal priority: the earlier one runs first.
    let rules: Vec<AnyFilterRule> = vec![
        FilterRule::replace("a||b").into(),
        FilterRule::replace("b||c").into(),
    ];
    let engine = TagFilterEngine::with_options(rules, options())?;
    assert_eq!(engine.filter_tags(&tags(&["a"])), tags(&["c"]));

    let reversed: Vec<AnyFilterRule> = vec![
        FilterRule::replace("b||c").into(),
        FilterRule::replace("a||b").into(),
    ];
    let engine = TagFilterEngine::with_options(reversed, options())?;
    assert_eq!(engine.filter_tags(&tags(&["a"])), tags(&["b"]));
    Ok(())
}

#[test]
fn test_optimized_stats_and_streaming() -> Result<()> {
    let engine = OptimizedTagFilterEngine::with_options(mixed_rules(), options().with_batch_size(3))?;
    let input = tags(&["nsfw", "smile", "bad", "red_hair", "cat", "dog", "naked"]);

    let streamed: Vec<String> = engine.chunked_stream(input.clone()).collect();
    assert_eq!(streamed, tags(&["smile", "good", "cat", "dog"]));

    let stats = engine.performance_stats().expect("optimized engine keeps stats");
    assert_eq!(stats.total_processed, 7);
    assert_eq!(stats.total_filtered, 3);
    assert!((stats.filter_rate - 3.0 / 7.0).abs() < 1e-9);
    assert!(stats.avg_processing_time >= 0.0);
    Ok(())
}

#[test]
fn test_memory_efficient_stream_skips_group_and_replacement() -> Result<()> {
    let engine = MemoryEfficientFilterEngine::with_options(mixed_rules(), options())?;
    let input = tags(&["steam", "sweat", "blush", "bad", "nsfw", "thing_old"]);
    let streamed: Vec<String> = engine.predicate_stream(input).collect();
    assert_eq!(streamed, tags(&["steam", "sweat", "blush", "bad", "thing_old"]));
    Ok(())
}

#[test]
fn test_trait_object_streaming() -> Result<()> {
    for kind in [EngineKind::Standard, EngineKind::Optimized, EngineKind::MemoryEfficient] {
        let engine = tagfilter_core::create_engine_of_kind(
            vec![FilterRule::plain_keyword("nsfw").into()],
            kind,
            options(),
        )?;
        let out: Vec<String> = engine
            .filter_stream(Box::new(tags(&["nsfw", "ok"]).into_iter()))
            .collect();
        assert_eq!(out, tags(&["ok"]), "engine {}", kind);
    }
    Ok(())
}

#[test]
fn test_rule_management_through_trait() -> Result<()> {
    let mut engine = create_engine(Vec::new(), "optimized", options())?;
    let rule: AnyFilterRule = FilterRule::plain_keyword("cat").into();

    engine.add_rule(rule.clone())?;
    assert_eq!(engine.filter_tags(&tags(&["cat", "dog"])), tags(&["dog"]));

    let err = engine.add_rule(FilterRule::regex("[unclosed").into()).unwrap_err();
    assert!(matches!(err, TagFilterError::InvalidPattern { .. }));
    assert_eq!(engine.rules().len(), 1);

    assert!(engine.remove_rule(&FilterRule::plain_keyword("cat").into())?);
    assert_eq!(engine.filter_tags(&tags(&["cat"])), tags(&["cat"]));
    Ok(())
}

#[test]
fn test_invalid_pattern_fails_construction() {
    let rules: Vec<AnyFilterRule> = vec![FilterRule::replace_capture("(x||$1").into()];
    let err = create_engine(rules, "memory_efficient", options()).err().unwrap();
    assert!(matches!(err, TagFilterError::InvalidPattern { .. }));
}
