//! End-to-end imports through converter, derivers, calculators and store

mod helpers;

use helpers::*;
use scorebridge_common::{Game, GameType, ImportType};
use scorebridge_import::converters::batch_manual;
use scorebridge_import::{CaptureSink, FailureKind, ItemOutcome, Severity};
use serde_json::{json, Value};

async fn seed_iidx(env: &TestEnv) {
    env.references
        .insert_song(&song(Game::Iidx, 1, "AA"))
        .await
        .unwrap();
    env.references
        .insert_chart(
            &chart(
                "aa-spa",
                1,
                GameType::IidxSp,
                "ANOTHER",
                12.0,
                Some(1834),
                &[
                    ("kt-NC", Some(11.2)),
                    ("kt-HC", Some(11.8)),
                    ("kt-EXHC", None),
                ],
            ),
            &[scorebridge_import::ChartKey::Title {
                title: "AA".into(),
                difficulty: "ANOTHER".into(),
            }],
        )
        .await
        .unwrap();
}

async fn seed_itg(env: &TestEnv) {
    env.references
        .insert_song(&song(Game::Itg, 7, "Stamina Song"))
        .await
        .unwrap();
    env.references
        .insert_chart(
            &chart("itg-hard", 7, GameType::ItgStamina, "Hard", 18.0, None, &[]),
            &[scorebridge_import::ChartKey::Title {
                title: "Stamina Song".into(),
                difficulty: "Hard".into(),
            }],
        )
        .await
        .unwrap();
}

fn iidx_file(scores: Vec<Value>) -> Value {
    json!({
        "meta": {"game": "iidx", "playtype": "SP", "service": "manual"},
        "scores": scores
    })
}

fn iidx_item(score: i64, lamp: &str, time: i64) -> Value {
    json!({
        "matchType": "title",
        "identifier": "AA",
        "difficulty": "ANOTHER",
        "score": score,
        "lamp": lamp,
        "timeAchieved": time,
        "judgements": {"pgreat": 1000, "great": 400}
    })
}

#[tokio::test]
async fn test_tier_list_ratings_follow_lamp() {
    let env = create_test_env().await;
    seed_iidx(&env).await;
    let diag = CaptureSink::new();

    let (context, items) = batch_manual::parse_file(&iidx_file(vec![
        iidx_item(3000, "EX HARD CLEAR", 1000),
        iidx_item(2900, "EASY CLEAR", 2000),
    ]))
    .unwrap();

    let doc = env
        .importer
        .import_batch(1, ImportType::BatchManual, &items, &context, &diag)
        .await
        .unwrap();
    assert_eq!(doc.score_ids.len(), 2, "errors: {:?}", doc.errors);

    let store = env.importer.store();
    let exhc = store.find_score(&doc.score_ids[0]).await.unwrap().unwrap();
    // EXHC tier is null, so the best non-null tier it reaches counts
    assert_eq!(exhc.calculated["ktLampRating"], Some(11.8));
    assert_eq!(exhc.service, "manual (BATCH-MANUAL)");
    assert_eq!(exhc.score_data.derived_enum("grade").unwrap().label, "AA");

    let easy = store.find_score(&doc.score_ids[1]).await.unwrap().unwrap();
    assert_eq!(easy.calculated["ktLampRating"], Some(0.0));

    let session = &doc.session_ratings[&GameType::IidxSp];
    assert_eq!(session["ktLampRating"], Some(5.9));

    let pb = store.find_personal_best(1, "aa-spa").await.unwrap().unwrap();
    assert_eq!(pb.score_data.integer("score").unwrap(), 3000);
    assert_eq!(pb.calculated["ktLampRating"], Some(11.8));
}

#[tokio::test]
async fn test_failed_itg_run_ranked_by_survival() {
    let env = create_test_env().await;
    seed_itg(&env).await;
    let diag = CaptureSink::new();

    let context = json!({"gameType": "itg:Stamina", "service": "manual"});
    let item = json!({
        "matchType": "title",
        "identifier": "Stamina Song",
        "difficulty": "Hard",
        "scorePercent": 91.5,
        "survivedPercent": 100.0,
        "lamp": "FAILED",
        "timeAchieved": 10
    });

    let outcome = env
        .importer
        .import_one(1, ImportType::BatchManual, &item, &context, &diag)
        .await;
    let score_id = match outcome {
        ItemOutcome::Imported {
            score_id,
            calculated,
            ..
        } => {
            assert_eq!(calculated["blockRating"], None);
            score_id
        }
        other => panic!("unexpected {:?}", other),
    };

    let record = env.importer.store().find_score(&score_id).await.unwrap().unwrap();
    assert_eq!(record.score_data.derived["finalPercent"].as_number(), Some(100.0));
    assert_eq!(record.score_data.derived_enum("grade").unwrap().label, "F");

    let stats = env
        .importer
        .update_profile(1, GameType::ItgStamina)
        .await
        .unwrap();
    assert_eq!(stats.ratings["highestBlock"], None);
}

#[tokio::test]
async fn test_unmapped_source_value_persists_nothing() {
    let env = create_test_env().await;
    let diag = CaptureSink::new();

    let item = json!({
        "music_id": 1,
        "difficulty": "DIFFICULTY_MAXIMUM",
        "clear": "CLEAR_FROM_A_NEWER_VERSION",
        "score": 9_000_000,
        "critical": 1000,
        "near": 10,
        "error": 2,
        "gauge": 10000,
        "max_chain": 900,
        "ex_score": 2500
    });

    let outcome = env
        .importer
        .import_one(
            1,
            ImportType::KsHookSv6c,
            &item,
            &json!({"timeReceived": 1}),
            &diag,
        )
        .await;

    match outcome {
        ItemOutcome::Failed {
            kind,
            message,
            incident_id,
        } => {
            assert_eq!(kind, FailureKind::Internal);
            let incident_id = incident_id.expect("internal failures carry an incident id");
            assert!(message.contains(&incident_id));
            assert!(!message.contains("CLEAR_FROM_A_NEWER_VERSION"));
        }
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(diag.max_severity(), Some(Severity::Severe));
    let store = env.importer.store();
    assert_eq!(store.count_scores(1).await.unwrap(), 0);
    assert!(store.orphans_for_user(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_same_play_gets_same_id_everywhere() {
    let first = create_test_env().await;
    let second = create_test_env().await;
    seed_iidx(&first).await;
    seed_iidx(&second).await;
    let diag = CaptureSink::new();

    let (context, items) =
        batch_manual::parse_file(&iidx_file(vec![iidx_item(2500, "CLEAR", 42)])).unwrap();

    let a = first
        .importer
        .import_one(5, ImportType::BatchManual, &items[0], &context, &diag)
        .await;
    let b = second
        .importer
        .import_one(5, ImportType::BatchManual, &items[0], &context, &diag)
        .await;

    let (ItemOutcome::Imported { score_id: id_a, .. }, ItemOutcome::Imported { score_id: id_b, .. }) =
        (&a, &b)
    else {
        panic!("unexpected outcomes {:?} / {:?}", a, b);
    };
    assert_eq!(id_a, id_b);

    let again = first
        .importer
        .import_one(5, ImportType::BatchManual, &items[0], &context, &diag)
        .await;
    assert_eq!(
        again,
        ItemOutcome::Duplicate {
            score_id: id_a.clone(),
            game_type: GameType::IidxSp
        }
    );
    assert_eq!(first.importer.store().count_scores(5).await.unwrap(), 1);
}

#[tokio::test]
async fn test_batch_reports_each_item() {
    let env = create_test_env().await;
    seed_iidx(&env).await;
    let diag = CaptureSink::new();

    let mut unknown_chart = iidx_item(2000, "CLEAR", 5);
    unknown_chart["identifier"] = json!("Not A Song");
    let mut bad_lamp = iidx_item(2000, "CLEAR", 6);
    bad_lamp["lamp"] = json!("SUPER CLEAR");

    let (context, items) = batch_manual::parse_file(&iidx_file(vec![
        iidx_item(2000, "CLEAR", 4),
        unknown_chart,
        bad_lamp,
    ]))
    .unwrap();

    let doc = env
        .importer
        .import_batch(2, ImportType::BatchManual, &items, &context, &diag)
        .await
        .unwrap();

    assert_eq!(doc.score_ids.len(), 1);
    assert_eq!(doc.orphan_ids.len(), 1);
    assert_eq!(doc.errors.len(), 1);
    assert_eq!(doc.errors[0].kind, "ConverterFailure");
    assert!(doc.errors[0].message.contains("SUPER CLEAR"));

    let stored = env.importer.store().find_import(&doc.import_id).await.unwrap();
    assert_eq!(stored.as_ref(), Some(&doc));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_batch_keeps_best_pb() {
    let env = create_test_env().await;
    seed_sdvx_chart(&env.references).await;
    let diag = CaptureSink::new();

    for user in 1..=5 {
        let items: Vec<Value> = (0..40)
            .map(|i| kshook_score(9_000_000 + i * 1000))
            .collect();

        let doc = env
            .importer
            .import_batch(user, ImportType::KsHookSv6c, &items, &kshook_context(), &diag)
            .await
            .unwrap();
        assert_eq!(doc.score_ids.len(), 40, "errors: {:?}", doc.errors);

        let pb = env
            .importer
            .store()
            .find_personal_best(user, "sdvx-mxm")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pb.score_data.integer("score").unwrap(), 9_039_000, "user {}", user);
    }
}

#[tokio::test]
async fn test_out_of_range_ir_score_is_rejected() {
    let env = create_test_env().await;
    seed_sdvx_chart(&env.references).await;
    let diag = CaptureSink::new();

    for score in [-1, 20_000_000] {
        let outcome = env
            .importer
            .import_one(
                1,
                ImportType::KsHookSv6c,
                &kshook_score(score),
                &kshook_context(),
                &diag,
            )
            .await;
        match outcome {
            ItemOutcome::Failed {
                kind,
                message,
                incident_id,
            } => {
                assert_eq!(kind, FailureKind::Converter);
                assert_eq!(message, format!("Invalid score of {}: out of range.", score));
                assert!(incident_id.is_none());
            }
            other => panic!("score {} gave {:?}", score, other),
        }
    }

    assert_eq!(diag.count(Severity::Severe), 0);
    assert_eq!(env.importer.store().count_scores(1).await.unwrap(), 0);
}
