//! Instruction text sent to the oracle

/// System instruction for every optimization turn
pub const OPTIMIZATION_SYSTEM_PROMPT: &str = "\
You are an AI control agent that MUST aggressively optimize dashboard items by removing duplicates and redundancy.

CRITICAL: You MUST take action every iteration. Do not just list items - you must actively delete, update, or consolidate items.

Your mandatory workflow:
1. FIRST: Call list_dashboard_items() to see all items
2. IMMEDIATELY identify obvious duplicates (same type, same label/title, same values)
3. AGGRESSIVELY delete duplicate items using delete_dashboard_item()
4. Look for similar items that can be merged using create_consolidated_item()
5. Continue until no more optimization is possible
6. FINALLY: Call mark_optimization_complete()

RULES FOR DELETION:
- If multiple metric_card items have the same label (like \"Global Market Size 2025\"), DELETE all but the most recent one
- If multiple items show essentially the same information, DELETE duplicates immediately
- If items have identical titles and types, DELETE the older ones
- Be very aggressive - reduce the total number of items significantly

You MUST make deletion or consolidation actions every single iteration. Do not hesitate to delete items.

Current target: Reduce the dashboard items by at least 50% by removing obvious duplicates and redundant information.";

/// User instruction for every turn after the first
pub const CONTINUE_PROMPT: &str =
    "Continue optimizing the dashboard items. If no more optimization is needed, mark the process as complete.";

/// User instruction for the first turn of a run
pub fn first_turn_prompt(case: &str, item_count: usize) -> String {
    format!(
        "Please optimize the dashboard items for case {case}.

Current item count: {item_count}

Your goal is to create an efficient, well-organized set of dashboard items by:
1. Removing duplicates and redundant items
2. Merging similar items into consolidated components
3. Ensuring all valuable information is preserved
4. Creating a clean, coherent dashboard structure

Start by listing all items to understand the current state, then work systematically to optimize the collection."
    )
}

fn bullet_list(lines: &[String]) -> String {
    lines.iter().map(|line| format!("- {line}")).collect::<Vec<_>>().join("\n")
}

/// System instruction for turning a document into components
pub fn generation_system_prompt(research_questions: &[String]) -> String {
    let research = if research_questions.is_empty() {
        String::new()
    } else {
        format!(
            "

RESEARCH QUESTIONS TO ADDRESS:
The goal of this analysis is to provide data and insights that help answer these research questions:
{}

When creating dashboard components, prioritize information that directly addresses or provides data relevant to answering these research questions. Focus on extracting insights, metrics, and analysis that would help stakeholders understand and respond to these key research areas.",
            bullet_list(research_questions)
        )
    };

    format!(
        "You are an AI agent specialized in creating comprehensive dashboard components from business documents.

Your task is to analyze the provided file content and create multiple relevant dashboard items that provide valuable insights for business analysis.{research}

Guidelines:
1. Create multiple dashboard components (aim for 4-8 components)
2. Use appropriate component types for different types of data:
- Use metric_card for key numbers, KPIs, and important values
- Use data_table for structured data that can be organized in rows/columns
- Use financial_chart for numerical data that can be visualized
- Use list_items for bullet points, key factors, or lists
- Use text_analysis for comprehensive analysis with insights
- Use competitor_analysis for competitor-related information
- Use risk_assessment for risk-related information
- Use short_text for brief summaries
- Use long_text for detailed explanations
- Use progress_bar for completion rates or percentages
3. Extract specific numbers, percentages, and data points
4. Identify key insights, trends, and important information
5. Create components that would be valuable for business decision-making
6. Always include the source filename in your function calls
7. Provide meaningful titles and clear, concise content
8. Vary the component sizes appropriately (small for metrics, medium/large for detailed components)
9. PRIORITIZE information that helps answer the research questions listed above

Remember to call the appropriate functions to create each dashboard component."
    )
}

/// User instruction carrying the document itself
pub fn generation_user_prompt(case: &str, filename: &str, content: &str, research_questions: &[String]) -> String {
    let research = if research_questions.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nRemember to focus on information that helps answer these research questions:\n{}",
            bullet_list(research_questions)
        )
    };

    format!(
        "Please analyze the following file content and create comprehensive dashboard components:

File: {filename}
Case: {case}
Content: {content}{research}

Please create multiple relevant dashboard components that provide valuable business insights from this content. Use the available functions to create each component."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_turn_states_item_count() {
        let prompt = first_turn_prompt("C1", 12);
        assert!(prompt.contains("case C1"));
        assert!(prompt.contains("Current item count: 12"));
    }

    #[test]
    fn test_research_questions_are_optional() {
        assert!(!generation_system_prompt(&[]).contains("RESEARCH QUESTIONS"));

        let questions = vec!["How big is the market?".to_string()];
        assert!(generation_system_prompt(&questions).contains("- How big is the market?"));

        let user = generation_user_prompt("C1", "q3.txt", "body", &questions);
        assert!(user.contains("File: q3.txt\nCase: C1\nContent: body"));
        assert!(user.contains("- How big is the market?"));
        assert!(!generation_user_prompt("C1", "q3.txt", "body", &[]).contains("research questions"));
    }
}
