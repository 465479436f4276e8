pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdl_exposes_queries_and_mutations() {
        let sdl = GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
            .finish()
            .sdl();

        assert!(sdl.contains("descriptiveHistory"));
        assert!(sdl.contains("submitTest"));
        assert!(sdl.contains("deleteTest"));
    }
}
