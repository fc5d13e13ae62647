//! Prompt construction for the text-to-SQL call.

use crate::schema::SCHEMA_OVERVIEW;

/// Build the full prompt sent to the model: schema, instructions, and the
/// user question embedded verbatim in a quoted section.
///
/// The instructions are advisory only. Nothing downstream verifies that the
/// model actually produced a single read-only statement.
pub fn build_prompt(question: &str) -> String {
    format!(
        "You are an expert SQL assistant for a hotel booking PostgreSQL database.\n\
         \n\
         Database schema:\n\
         \n\
         {SCHEMA_OVERVIEW}\n\
         \n\
         TASK:\n\
         - Given the user question below, write ONE valid PostgreSQL query.\n\
         - Only use tables and columns that exist in the schema.\n\
         - Prefer the analytical views when possible (view_*).\n\
         - Do NOT modify data (no INSERT, UPDATE, DELETE, DROP, ALTER).\n\
         - Return ONLY the SQL query, without ```sql``` markers or explanations.\n\
         \n\
         User question:\n\
         \"\"\"{question}\"\"\"\n"
    )
}
