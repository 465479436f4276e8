mod common;

use std::sync::Arc;

use futures::TryStreamExt;

use common::*;
use examforge_server::{
    errors::AppError,
    models::{
        domain::{
            AttemptStart, DescriptiveAttempt, Evaluation, PdfDocument, Question, SubmittedAnswer,
            TestDefinition, TestSource, User,
        },
        dto::request::{CreateTestRequest, EvaluateAnswerRequest, SubmitTestRequest},
    },
    repositories::{
        AttemptRepository, DescriptiveRepository, PdfRepository, ResultRepository,
        TestRepository, UserRepository,
    },
    services::{
        DescriptiveService, PdfService, ResultService, ScoringEngine, ScoringPolicy, TestService,
    },
};

fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n% fake body".to_vec()
}

#[tokio::test]
async fn user_repository_enforces_unique_email() {
    let repo = InMemoryUserRepository::default();

    let ada = repo
        .create(User::new("Ada", "ada@example.com", "hash"))
        .await
        .expect("create ada");
    let duplicate = repo.create(User::new("Other", "ada@example.com", "hash")).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let by_email = repo
        .find_by_email("ada@example.com")
        .await
        .expect("find by email should work");
    assert_eq!(by_email.map(|u| u.id), Some(ada.id.clone()));

    let by_id = repo.find_by_id(&ada.id).await.expect("find by id should work");
    assert!(by_id.is_some());
}

#[tokio::test]
async fn test_repository_lists_newest_first_and_pages() {
    let repo = InMemoryTestRepository::default();

    // Same stored timestamp for all three: creation order comes from the ids.
    let stamp = chrono::Utc::now();
    let mut ids = Vec::new();
    for i in 0..3 {
        let mut test = TestDefinition::new("owner-a", &format!("Test {}", i), "", sample_questions());
        test.created_at = stamp;
        ids.push(test.id.clone());
        repo.create(test).await.expect("create test");
    }
    repo.create(TestDefinition::new("owner-b", "Other", "", sample_questions()))
        .await
        .expect("create other owner's test");

    let (first_page, total) = repo.list_by_owner("owner-a", 0, 2).await.expect("list");
    assert_eq!(total, 3);
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].id, ids[2]);
    assert_eq!(first_page[1].id, ids[1]);

    let (second_page, _) = repo.list_by_owner("owner-a", 2, 2).await.expect("list");
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, ids[0]);

    let missing = repo
        .replace_questions("missing", sample_questions())
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert!(repo.delete(&ids[0]).await.expect("delete"));
    assert!(!repo.delete(&ids[0]).await.expect("second delete"));
}

#[tokio::test]
async fn result_repository_rejects_duplicate_idempotency_keys() {
    let repo = InMemoryResultRepository::default();
    let engine = ScoringEngine::default();

    let test = TestDefinition::new("owner", "T", "", sample_questions());
    let mut first = engine.score(
        examforge_server::services::scoring::ScoringInput {
            user_id: "user-a",
            test_id: &test.id,
            test_title: &test.title,
            questions: test.questions.clone(),
        },
        Vec::new(),
    );
    first.idempotency_key = "key-1".to_string();
    let mut second = first.clone();
    second.id = "another-id".to_string();

    repo.create(first.clone()).await.expect("first insert");
    let duplicate = repo.create(second).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let found = repo
        .find_by_idempotency_key("key-1")
        .await
        .expect("lookup by key");
    assert_eq!(found.map(|r| r.id), Some(first.id));
}

#[tokio::test]
async fn pdf_and_descriptive_repositories_scope_deletes_to_owner() {
    let pdfs = InMemoryPdfRepository::default();
    let pdf = pdfs
        .create(PdfDocument::new("user-a", "Notes", "text".to_string(), 10, 1, vec![]))
        .await
        .expect("create pdf");

    assert!(!pdfs.delete_for_user(&pdf.id, "user-b").await.expect("delete"));
    assert!(pdfs.delete_for_user(&pdf.id, "user-a").await.expect("delete"));

    let descriptive = InMemoryDescriptiveRepository::default();
    let attempt = descriptive
        .create(DescriptiveAttempt::record(
            "user-a",
            "UPSC",
            "Discuss federalism.",
            "Federalism divides power.",
            30,
            600,
            Evaluation {
                score: 60,
                feedback: "ok".to_string(),
                strengths: vec![],
                areas_to_improve: vec![],
                suggestions: vec![],
            },
        ))
        .await
        .expect("create attempt");

    assert!(!descriptive
        .delete_for_user(&attempt.id, "user-b")
        .await
        .expect("delete"));
    assert_eq!(
        descriptive.list_by_user("user-a").await.expect("list").len(),
        1
    );
}

#[tokio::test]
async fn attempt_repository_round_trips_snapshots() {
    let repo = InMemoryAttemptRepository::default();
    let test = TestDefinition::new("owner", "T", "", sample_questions());

    let attempt = repo
        .create(AttemptStart::snapshot("user-a", &test))
        .await
        .expect("create attempt");
    let found = repo.find_by_id(&attempt.id).await.expect("find");

    assert_eq!(found.map(|a| a.questions.len()), Some(4));
}

fn services(
    generator: StubGenerator,
) -> (
    TestService,
    ResultService,
    PdfService,
    Arc<InMemoryResultRepository>,
) {
    let tests: Arc<InMemoryTestRepository> = Arc::new(InMemoryTestRepository::default());
    let attempts: Arc<InMemoryAttemptRepository> = Arc::new(InMemoryAttemptRepository::default());
    let results: Arc<InMemoryResultRepository> = Arc::new(InMemoryResultRepository::default());
    let pdfs: Arc<InMemoryPdfRepository> = Arc::new(InMemoryPdfRepository::default());
    let generator = Arc::new(generator);

    let test_service = TestService::new(
        tests.clone(),
        attempts.clone(),
        pdfs.clone(),
        generator.clone(),
    );
    let result_service = ResultService::new(
        results.clone(),
        attempts,
        tests,
        ScoringEngine::new(ScoringPolicy::default()),
        30,
    );
    let pdf_service = PdfService::new(pdfs, Arc::new(StubExtractor), generator, 1024 * 1024);

    (test_service, result_service, pdf_service, results)
}

async fn create_sample_test(service: &TestService, owner: &str) -> TestDefinition {
    service
        .create_test(
            owner,
            CreateTestRequest {
                title: "Sample".to_string(),
                description: None,
                duration_minutes: None,
                total_marks: None,
                passing_marks: None,
                questions: sample_questions(),
            },
        )
        .await
        .expect("create test")
}

#[tokio::test]
async fn scenario_scores_under_simple_count_policy() {
    let (tests, results, _, _) = services(StubGenerator::failing());
    let test = create_sample_test(&tests, "owner").await;
    let answers = |indices: &[u32]| SubmitTestRequest {
        answers: indices.iter().map(|&i| Some(SubmittedAnswer::Index(i))).collect(),
        ..Default::default()
    };

    // Scenario A: all four correct.
    let record = results
        .submit("user-a", &test.id, answers(&[1, 1, 2, 1]))
        .await
        .expect("submit");
    assert_eq!(record.score, 4.0);
    assert!(record.passed);

    // Scenario B: one wrong, different user so the window key differs.
    let record = results
        .submit("user-b", &test.id, answers(&[1, 1, 9, 1]))
        .await
        .expect("submit");
    assert_eq!((record.correct_answers, record.wrong_answers), (3, 1));
    assert_eq!(record.score, 3.0);

    // Scenario C: nothing answered.
    let record = results
        .submit("user-c", &test.id, answers(&[]))
        .await
        .expect("submit");
    assert_eq!((record.correct_answers, record.wrong_answers), (0, 4));
    assert_eq!(record.score, 0.0);
    assert!(!record.passed);
    assert_eq!(record.total_questions, 4);
}

#[tokio::test]
async fn timer_and_manual_double_submit_store_one_result() {
    let (tests, results, _, store) = services(StubGenerator::failing());
    let test = create_sample_test(&tests, "owner").await;
    let started = tests
        .get_test_for_attempt(&test.id, "user-a")
        .await
        .expect("start");

    let request = SubmitTestRequest {
        answers: vec![Some(SubmittedAnswer::Index(1))],
        attempt_id: Some(started.attempt_id.clone()),
        ..Default::default()
    };

    let (first, second) = tokio::join!(
        results.submit("user-a", &test.id, request.clone()),
        results.submit("user-a", &test.id, request),
    );
    let first = first.expect("first submit");
    let second = second.expect("second submit");

    assert_eq!(first.id, second.id);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn editing_a_test_mid_attempt_does_not_change_scoring() {
    let (tests, results, _, _) = services(StubGenerator::failing());
    let test = create_sample_test(&tests, "owner").await;
    let started = tests
        .get_test_for_attempt(&test.id, "user-a")
        .await
        .expect("start");

    tests
        .update_questions(
            &test.id,
            "owner",
            vec![Question::new("Replaced", &["x", "y"], 0)],
        )
        .await
        .expect("owner edits test");

    let record = results
        .submit(
            "user-a",
            &test.id,
            SubmitTestRequest {
                answers: vec![Some(SubmittedAnswer::Text("Paris".to_string()))],
                attempt_id: Some(started.attempt_id),
                ..Default::default()
            },
        )
        .await
        .expect("submit");

    assert_eq!(record.total_questions, 4);
    assert_eq!(record.correct_answers, 1);
}

#[tokio::test]
async fn deleting_a_test_keeps_results_and_blocks_new_submissions() {
    let (tests, results, _, _) = services(StubGenerator::failing());
    let test = create_sample_test(&tests, "owner").await;

    let record = results
        .submit("user-a", &test.id, SubmitTestRequest::default())
        .await
        .expect("submit");

    tests.delete_test(&test.id, "owner").await.expect("delete");

    let kept = results
        .get_result(&record.id, "user-a")
        .await
        .expect("result survives test deletion");
    assert_eq!(kept.test_id, test.id);

    let err = results
        .submit(
            "user-b",
            &test.id,
            SubmitTestRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn list_streams_are_restartable() {
    let (tests, results, _, _) = services(StubGenerator::failing());
    for _ in 0..3 {
        create_sample_test(&tests, "owner").await;
    }

    let first: Vec<TestDefinition> = tests.list_tests("owner").try_collect().await.expect("list");
    let second: Vec<TestDefinition> = tests.list_tests("owner").try_collect().await.expect("list");
    assert_eq!(first.len(), 3);
    assert_eq!(
        first.iter().map(|t| &t.id).collect::<Vec<_>>(),
        second.iter().map(|t| &t.id).collect::<Vec<_>>()
    );

    let none: Vec<_> = results
        .list_results("nobody")
        .try_collect()
        .await
        .expect("empty list");
    assert!(none.is_empty());
}

#[tokio::test]
async fn generated_tests_use_the_generator_when_it_succeeds() {
    let (tests, _, _, _) = services(StubGenerator::with_questions(sample_questions()));

    let test = tests
        .create_from_catalog(
            "owner",
            examforge_server::constants::CatalogKind::CurrentAffairs,
            Some("My quiz".to_string()),
        )
        .await
        .expect("create from catalog");

    assert_eq!(test.source, TestSource::Generated);
    assert_eq!(test.title, "My quiz");
    assert_eq!(test.total_marks, 4);
    assert_eq!(test.passing_marks, 3);
}

#[tokio::test]
async fn pdf_ingestion_feeds_test_generation() {
    let (tests, _, pdfs, _) = services(StubGenerator::with_questions(sample_questions()));

    let pdf = pdfs
        .ingest("owner", "Biology", pdf_bytes(), Some("plants"), 2)
        .await
        .expect("ingest");
    assert_eq!(pdf.mcqs.len(), 2);
    assert_eq!(pdf.page_count, 3);
    assert_eq!(pdf.content, EXTRACTED_TEXT);

    let test = tests
        .create_from_pdfs("owner", &[pdf.id.clone()], None)
        .await
        .expect("create from pdfs");
    assert_eq!(test.source, TestSource::Pdf);
    assert_eq!(test.title, "Biology Test");
    assert_eq!(test.questions.len(), 2);

    let other_user = tests
        .create_from_pdfs("intruder", &[pdf.id], None)
        .await
        .unwrap_err();
    assert!(matches!(other_user, AppError::NotFound(_)));
}

#[tokio::test]
async fn pdf_ingestion_degrades_when_generation_fails() {
    let (tests, _, pdfs, _) = services(StubGenerator::failing());

    let pdf = pdfs
        .ingest("owner", "Notes", pdf_bytes(), None, 5)
        .await
        .expect("ingest still succeeds");
    assert!(pdf.mcqs.is_empty());

    let err = tests
        .create_from_pdfs("owner", &[pdf.id], None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn pdf_ingestion_rejects_bad_uploads() {
    let (_, _, pdfs, _) = services(StubGenerator::failing());

    let empty = pdfs.ingest("owner", "Empty", Vec::new(), None, 5).await;
    assert!(matches!(empty, Err(AppError::ValidationError(_))));

    let not_pdf = pdfs
        .ingest("owner", "Text", b"hello world".to_vec(), None, 5)
        .await;
    assert!(matches!(not_pdf, Err(AppError::ValidationError(_))));

    let mut huge = pdf_bytes();
    huge.resize(2 * 1024 * 1024, b' ');
    let too_big = pdfs.ingest("owner", "Huge", huge, None, 5).await;
    assert!(matches!(too_big, Err(AppError::ValidationError(_))));

    let missing = pdfs.delete("missing", "owner").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn descriptive_answers_are_evaluated_and_recorded() {
    let repo = Arc::new(InMemoryDescriptiveRepository::default());
    let service = DescriptiveService::new(repo, Arc::new(StubEvaluator { score: 81 }));

    let attempt = service
        .evaluate_and_record(
            "user-a",
            EvaluateAnswerRequest {
                exam_name: "UPSC".to_string(),
                question: "Discuss federalism.".to_string(),
                answer: "Power is shared between levels of government.".to_string(),
                time_limit_minutes: 20,
                time_taken_seconds: 300,
            },
        )
        .await
        .expect("evaluate");

    assert_eq!(attempt.score, 81);
    assert_eq!(attempt.word_count, 7);

    let history = service.history("user-a").await.expect("history");
    assert_eq!(history.len(), 1);

    let improved = service
        .improve("UPSC", "Q", "Short answer")
        .await
        .expect("improve");
    assert_eq!(improved, "Short answer (improved)");

    let err = service.delete(&attempt.id, "user-b").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    service.delete(&attempt.id, "user-a").await.expect("delete");
}
