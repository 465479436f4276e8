use std::{sync::Arc, time::Duration};

use crate::{
    auth::{InMemoryRateLimiter, JwtService, RateLimiter},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptRepository, DescriptiveRepository, MongoAttemptRepository,
        MongoDescriptiveRepository, MongoPdfRepository, MongoResultRepository,
        MongoTestRepository, MongoUserRepository, PdfRepository, ResultRepository,
        TestRepository, UserRepository,
    },
    services::{
        AiAnswerEvaluator, AiClient, AiQuestionGenerator, AnswerEvaluator, DescriptiveService,
        PdfService, PdfTextExtractor, QuestionGenerator, ResultService, ScoringEngine,
        TestService, TextExtractor, UserService,
    },
};

/// Storage backends the services are built on.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tests: Arc<dyn TestRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub pdfs: Arc<dyn PdfRepository>,
    pub descriptive: Arc<dyn DescriptiveRepository>,
}

/// External services: the AI model and the PDF parser.
pub struct Collaborators {
    pub generator: Arc<dyn QuestionGenerator>,
    pub evaluator: Arc<dyn AnswerEvaluator>,
    pub extractor: Arc<dyn TextExtractor>,
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub test_service: Arc<TestService>,
    pub result_service: Arc<ResultService>,
    pub pdf_service: Arc<PdfService>,
    pub descriptive_service: Arc<DescriptiveService>,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let test_repository = Arc::new(MongoTestRepository::new(&db));
        test_repository.ensure_indexes().await?;
        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;
        let result_repository = Arc::new(MongoResultRepository::new(&db));
        result_repository.ensure_indexes().await?;
        let pdf_repository = Arc::new(MongoPdfRepository::new(&db));
        pdf_repository.ensure_indexes().await?;
        let descriptive_repository = Arc::new(MongoDescriptiveRepository::new(&db));
        descriptive_repository.ensure_indexes().await?;

        let ai_client = AiClient::new(&config);
        let collaborators = Collaborators {
            generator: Arc::new(AiQuestionGenerator::new(ai_client.clone())),
            evaluator: Arc::new(AiAnswerEvaluator::new(ai_client)),
            extractor: Arc::new(PdfTextExtractor),
        };

        let repositories = Repositories {
            users: user_repository,
            tests: test_repository,
            attempts: attempt_repository,
            results: result_repository,
            pdfs: pdf_repository,
            descriptive: descriptive_repository,
        };

        Ok(Self::from_parts(config, repositories, collaborators, Some(db)))
    }

    /// Wires services over the given backends. Used directly by tests with
    /// in-memory repositories and stub collaborators.
    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        collaborators: Collaborators,
        db: Option<Database>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        let rate_limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(
            config.login_rate_limit_max_attempts,
            Duration::from_secs(config.login_rate_limit_window_seconds),
        ));

        let user_service = Arc::new(UserService::new(
            repositories.users,
            Arc::clone(&jwt_service),
        ));

        let test_service = Arc::new(TestService::new(
            Arc::clone(&repositories.tests),
            Arc::clone(&repositories.attempts),
            Arc::clone(&repositories.pdfs),
            Arc::clone(&collaborators.generator),
        ));

        let result_service = Arc::new(ResultService::new(
            repositories.results,
            repositories.attempts,
            repositories.tests,
            ScoringEngine::new(config.scoring_policy()),
            config.submission_window_seconds,
        ));

        let pdf_service = Arc::new(PdfService::new(
            repositories.pdfs,
            collaborators.extractor,
            collaborators.generator,
            config.max_pdf_bytes,
        ));

        let descriptive_service = Arc::new(DescriptiveService::new(
            repositories.descriptive,
            collaborators.evaluator,
        ));

        Self {
            user_service,
            test_service,
            result_service,
            pdf_service,
            descriptive_service,
            jwt_service,
            rate_limiter,
            db,
            config: Arc::new(config),
        }
    }
}
