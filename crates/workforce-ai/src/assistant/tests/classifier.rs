use std::sync::Arc;

use super::common::*;
use crate::assistant::{ClassifierStage, Intent};
use crate::i18n::Language;

#[test]
fn keyword_hit_skips_the_model_entirely() {
    // A model whose language slot fails: any escalation would return English.
    let model = Arc::new(ScriptedModel {
        language: None,
        ..ScriptedModel::default()
    });
    let stage = ClassifierStage::new(model.clone());

    assert_eq!(
        stage.detect_language("Sawubona, ngicela ukubona imali yami"),
        Language::Zu
    );
    assert!(model.prompts().is_empty());
}

#[test]
fn inconclusive_text_escalates_to_the_model() {
    let model = Arc::new(ScriptedModel {
        language: Some("xh".to_string()),
        ..ScriptedModel::default()
    });
    let stage = ClassifierStage::new(model.clone());

    assert_eq!(stage.detect_language("enkos"), Language::Xh);
    assert_eq!(model.prompts().len(), 1);
}

#[test]
fn unsupported_model_code_defaults_to_english() {
    let model = Arc::new(ScriptedModel {
        language: Some("fr".to_string()),
        ..ScriptedModel::default()
    });
    let stage = ClassifierStage::new(model);
    assert_eq!(stage.detect_language("bonjour"), Language::En);
}

#[test]
fn model_failure_defaults_to_english() {
    let model = Arc::new(ScriptedModel {
        language: None,
        ..ScriptedModel::default()
    });
    let stage = ClassifierStage::new(model);
    assert_eq!(stage.detect_language("??"), Language::En);
}

#[test]
fn intent_replies_are_normalized() {
    let model = Arc::new(ScriptedModel::with_intent(" EWA_Request \n"));
    let stage = ClassifierStage::new(model);
    assert_eq!(
        stage.classify_intent("I need an advance on my salary"),
        Intent::EwaRequest
    );
}

#[test]
fn unknown_intent_and_failures_default_to_hr_query() {
    let garbage = Arc::new(ScriptedModel::with_intent("weather_report"));
    assert_eq!(
        ClassifierStage::new(garbage).classify_intent("hello"),
        Intent::HrQuery
    );

    let broken = Arc::new(ScriptedModel {
        intent: None,
        ..ScriptedModel::default()
    });
    assert_eq!(
        ClassifierStage::new(broken).classify_intent("hello"),
        Intent::HrQuery
    );
}
