use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::AppResult,
    graphql::helpers::{page_bounds, parse_id},
    models::dto::response::{
        DescriptiveAttemptDto, PdfSummaryDto, ResultSummaryDto, TestSummaryDto, UserDto,
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn me(&self, ctx: &Context<'_>) -> AppResult<UserDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.user_service.get_user(&claims.sub).await
    }

    async fn tests(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Vec<TestSummaryDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let (offset, limit) = page_bounds(offset, limit);
        let (tests, _) = state
            .test_service
            .list_tests_page(&claims.sub, offset, limit)
            .await?;

        Ok(tests.iter().map(TestSummaryDto::from).collect())
    }

    async fn test(&self, ctx: &Context<'_>, id: ID) -> AppResult<TestSummaryDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let test = state
            .test_service
            .get_test(&parse_id(&id)?, &claims.sub)
            .await?;
        Ok(TestSummaryDto::from(&test))
    }

    async fn results(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Vec<ResultSummaryDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let (offset, limit) = page_bounds(offset, limit);
        let (results, _) = state
            .result_service
            .list_results_page(&claims.sub, offset, limit)
            .await?;

        Ok(results.iter().map(ResultSummaryDto::from).collect())
    }

    async fn result(&self, ctx: &Context<'_>, id: ID) -> AppResult<ResultSummaryDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let record = state
            .result_service
            .get_result(&parse_id(&id)?, &claims.sub)
            .await?;
        Ok(ResultSummaryDto::from(&record))
    }

    async fn pdfs(&self, ctx: &Context<'_>) -> AppResult<Vec<PdfSummaryDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let pdfs = state.pdf_service.list(&claims.sub).await?;
        Ok(pdfs.iter().map(PdfSummaryDto::from).collect())
    }

    async fn descriptive_history(&self, ctx: &Context<'_>) -> AppResult<Vec<DescriptiveAttemptDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let attempts = state.descriptive_service.history(&claims.sub).await?;
        Ok(attempts.into_iter().map(DescriptiveAttemptDto::from).collect())
    }
}
