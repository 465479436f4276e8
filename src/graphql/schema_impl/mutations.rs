use async_graphql::{Context, InputObject, Object, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::AppResult,
    graphql::helpers::parse_id,
    models::{
        domain::SubmittedAnswer,
        dto::{request::SubmitTestRequest, response::ResultSummaryDto},
    },
};

/// Answers are option indices; `null` or a negative index means unanswered.
#[derive(InputObject)]
pub struct SubmitTestInput {
    pub test_id: ID,
    pub answers: Vec<Option<i64>>,
    pub attempt_id: Option<String>,
    pub submission_key: Option<String>,
    pub time_taken_seconds: Option<i64>,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn submit_test(
        &self,
        ctx: &Context<'_>,
        input: SubmitTestInput,
    ) -> AppResult<ResultSummaryDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let test_id = parse_id(&input.test_id)?;
        let request = SubmitTestRequest {
            answers: input
                .answers
                .into_iter()
                .map(|answer| answer.and_then(SubmittedAnswer::from_index))
                .collect(),
            attempt_id: input.attempt_id,
            submission_key: input.submission_key,
            time_taken_seconds: input.time_taken_seconds,
        };

        let record = state
            .result_service
            .submit(&claims.sub, &test_id, request)
            .await?;
        Ok(ResultSummaryDto::from(&record))
    }

    async fn delete_test(&self, ctx: &Context<'_>, id: ID) -> AppResult<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .test_service
            .delete_test(&parse_id(&id)?, &claims.sub)
            .await?;
        Ok(true)
    }
}
