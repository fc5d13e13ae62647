//! End-to-end orchestration: question -> prompt -> model -> SQL -> rows.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::db::{create_client, execute_query, ConnectionConfig, QueryResult};
use crate::export;
use crate::extract::extract_sql;
use crate::llm::LanguageModel;
use crate::prompt::build_prompt;

/// Number of rows shown in the verbose result preview.
const PREVIEW_ROWS: usize = 5;

pub struct Agent {
    model: Arc<dyn LanguageModel>,
    db: ConnectionConfig,
    verbose: bool,
}

impl Agent {
    pub fn new(model: Arc<dyn LanguageModel>, db: ConnectionConfig) -> Self {
        Self {
            model,
            db,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Ask the model to translate a question into SQL. The raw completion
    /// is run through the fence/semicolon extraction; the result may still
    /// be invalid SQL, which only the database will discover.
    pub async fn generate_sql(&self, question: &str) -> Result<String> {
        let prompt = build_prompt(question);
        tracing::debug!(prompt_bytes = prompt.len(), "sending prompt");
        let raw = self
            .model
            .generate(&prompt)
            .await
            .with_context(|| format!("model {:?} failed to answer", self.model.name()))?;
        Ok(extract_sql(&raw))
    }

    /// Answer a natural-language question with a table of rows.
    ///
    /// A failed model call is fatal for the invocation and propagates. A
    /// failed database call (connect or execute) is reported on the
    /// diagnostic channel and yields `Ok(None)` so the caller can carry on.
    /// Neither step is retried.
    pub async fn ask(&self, question: &str) -> Result<Option<QueryResult>> {
        if self.verbose {
            println!("USER QUESTION:\n{}\n", question);
        }

        let sql = self.generate_sql(question).await?;

        if self.verbose {
            println!("Generated SQL:\n\n{}\n", sql);
        }

        let result = match self.run_sql(&sql).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("failed to execute generated SQL: {e:#}");
                return Ok(None);
            }
        };

        tracing::debug!(
            rows = result.row_count,
            elapsed_ms = result.execution_time.as_millis() as u64,
            "query finished"
        );

        if self.verbose {
            println!("Result preview:\n{}", export::preview(&result, PREVIEW_ROWS));
        }

        Ok(Some(result))
    }

    /// One scoped connection per call; dropped once rows are materialized.
    async fn run_sql(&self, sql: &str) -> Result<QueryResult> {
        let client = create_client(&self.db).await?;
        let result = execute_query(&client, sql)
            .await
            .map_err(|e| anyhow::anyhow!(e.display_full()))?;
        Ok(result)
    }
}
