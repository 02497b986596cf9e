//! Prompt templates for summarization

use docbrief_common::{DocBriefError, Result};

use crate::chunking::truncate_chars;
use crate::sections::SummarySection;
use crate::types::{ContextProfile, RefinementAction, RoleProfile};

/// Maximum number of keyword hints embedded in a structured prompt
const MAX_KEYWORD_HINTS: usize = 10;

const EXECUTIVE_INSTRUCTION: &str = "You are summarizing for C-level executives. Focus on:
- High-level strategic insights and business impact
- Key decisions and recommendations
- Financial implications and ROI
- Risk assessment and mitigation strategies
- Actionable next steps for leadership";

const STUDENT_INSTRUCTION: &str = "You are summarizing for students. Focus on:
- Clear explanations of key concepts
- Learning objectives and takeaways
- Important definitions and terminology
- Examples and practical applications
- Study tips and important points to remember";

const ANALYST_INSTRUCTION: &str = "You are summarizing for data analysts. Focus on:
- Statistical findings and data trends
- Methodology and approach
- Key metrics and quantitative insights
- Patterns, correlations, and anomalies
- Data-driven recommendations";

const GENERAL_INSTRUCTION: &str = "Provide a clear, comprehensive summary that:
- Captures the main points and key information
- Is easy to understand for a general audience
- Highlights important facts and conclusions
- Maintains objectivity and clarity";

const STUDENT_ROLE_INSTRUCTION: &str = "You are summarizing for a STUDENT. Focus on:
- Clear explanations of concepts and terminology
- Learning objectives and educational value
- Simplified language without losing accuracy
- Examples and applications for better understanding
- Study-friendly structure";

const RESEARCHER_ROLE_INSTRUCTION: &str = "You are summarizing for a RESEARCHER. Focus on:
- Methodological details and research design
- Novel findings and contributions to the field
- Statistical significance and data analysis
- Theoretical frameworks and implications
- References to related work and future research directions";

const PROFESSIONAL_ROLE_INSTRUCTION: &str = "You are summarizing for a PROFESSIONAL. Focus on:
- Practical applications and business value
- Implementation considerations and feasibility
- ROI and cost-benefit analysis
- Strategic implications and competitive advantage
- Actionable recommendations and next steps";

/// Output format requested from the model for every structured prompt
pub const FORMAT_DIRECTIVE: &str = "Format your response EXACTLY as:
[OVERVIEW]
Your overview here...

[KEY INSIGHTS]
Your insights here...

[RISKS]
Your risks here...

[RECOMMENDATIONS]
Your recommendations here...

Leave a section empty if it does not apply.";

impl ContextProfile {
    /// Fixed instruction block for this audience
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Executive => EXECUTIVE_INSTRUCTION,
            Self::Student => STUDENT_INSTRUCTION,
            Self::Analyst => ANALYST_INSTRUCTION,
            Self::General => GENERAL_INSTRUCTION,
        }
    }
}

impl RoleProfile {
    /// Tone and focus instruction for this role
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Student => STUDENT_ROLE_INSTRUCTION,
            Self::Researcher => RESEARCHER_ROLE_INSTRUCTION,
            Self::Professional => PROFESSIONAL_ROLE_INSTRUCTION,
        }
    }
}

impl SummarySection {
    /// Line describing the section in the request body
    fn request_line(&self) -> &'static str {
        match self {
            Self::Overview => "OVERVIEW: A comprehensive summary of the main content (3-4 paragraphs)",
            Self::KeyInsights => {
                "KEY INSIGHTS: The most important findings, concepts, or takeaways (3-5 bullet points)"
            }
            Self::Risks => {
                "RISKS & CHALLENGES: Potential issues, concerns, or challenges mentioned (3-4 bullet points)"
            }
            Self::Recommendations => {
                "RECOMMENDATIONS: Actionable suggestions or next steps (3-4 bullet points)"
            }
        }
    }
}

/// How an existing text should be rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineInstruction {
    /// Cut by roughly half, keeping critical facts
    Shorten,
    /// Remove redundancy and improve clarity at the same length
    Clarify,
    /// Add detail and examples
    Expand,
    /// Rewrite around a given aspect
    Focus(String),
}

impl RefineInstruction {
    /// Resolve a rewrite style name.
    ///
    /// `focus` requires a non-empty `focus` argument; `focus_methods` and
    /// `focus_results` carry their own.
    pub fn from_style(style: &str, focus: Option<&str>) -> Result<Self> {
        match style.trim().to_lowercase().as_str() {
            "shorten" | "shorter" => Ok(Self::Shorten),
            "clarify" | "refine" => Ok(Self::Clarify),
            "expand" | "detailed" => Ok(Self::Expand),
            "focus_methods" => Ok(Self::Focus(
                "methodology, approach, and technical details".to_string(),
            )),
            "focus_results" => Ok(Self::Focus(
                "results, outcomes, and key findings".to_string(),
            )),
            "focus" | "focus_custom" => match focus.map(str::trim).filter(|f| !f.is_empty()) {
                Some(aspect) => Ok(Self::Focus(aspect.to_string())),
                None => Err(DocBriefError::invalid_input(
                    "A focus style requires a non-empty focus description",
                )),
            },
            other => Err(DocBriefError::invalid_input(format!(
                "Unknown rewrite style '{}'",
                other
            ))),
        }
    }

    /// Per-field rewrite for a refinement action; `None` for `regenerate`
    pub fn for_action(action: RefinementAction) -> Option<Self> {
        match action {
            RefinementAction::Shorten => Some(Self::Shorten),
            RefinementAction::Refine => Some(Self::Clarify),
            RefinementAction::Regenerate => None,
        }
    }
}

/// Inputs of a single prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub text: &'a str,
    pub context: ContextProfile,
    pub role: Option<RoleProfile>,
    pub keywords: &'a [String],
    pub action: Option<RefinementAction>,
}

impl<'a> PromptRequest<'a> {
    pub fn new(text: &'a str, context: ContextProfile) -> Self {
        Self {
            text,
            context,
            role: None,
            keywords: &[],
            action: None,
        }
    }
}

/// Composes model prompts. Pure: no I/O, deterministic.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_input_chars: usize,
    keyword_input_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            max_input_chars: 50_000,
            keyword_input_chars: 10_000,
        }
    }
}

impl PromptBuilder {
    pub fn new(max_input_chars: usize, keyword_input_chars: usize) -> Self {
        Self {
            max_input_chars: max_input_chars.max(1),
            keyword_input_chars: keyword_input_chars.max(1),
        }
    }

    /// Single entry point: structured generation, or a refinement variant
    /// when `action` is set. `regenerate` reuses the structured template.
    pub fn build(&self, request: &PromptRequest<'_>) -> String {
        let instruction = request.action.and_then(RefineInstruction::for_action);
        match instruction {
            Some(instruction) => self.refinement(request.text, &instruction),
            None => self.structured(
                request.text,
                request.context,
                request.role,
                request.keywords,
            ),
        }
    }

    /// Prompt requesting the four bracket-delimited sections
    pub fn structured(
        &self,
        text: &str,
        context: ContextProfile,
        role: Option<RoleProfile>,
        keywords: &[String],
    ) -> String {
        let mut prompt = String::new();

        if let Some(role) = role {
            prompt.push_str(role.instruction());
            prompt.push_str("\n\n");
        }

        prompt.push_str("You are an expert summarizer. ");
        prompt.push_str(context.instruction());
        prompt.push_str("\n\n");

        let hints: Vec<&str> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .take(MAX_KEYWORD_HINTS)
            .collect();
        if !hints.is_empty() {
            prompt.push_str(&format!("Key terms to focus on: {}\n\n", hints.join(", ")));
        }

        prompt.push_str(
            "Analyze the following document and provide a structured summary with these sections:\n",
        );
        for (i, section) in context.requested_sections().iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, section.request_line()));
        }

        prompt.push_str(&format!(
            "\nDocument:\n{}\n\n{}\n",
            truncate_chars(text, self.max_input_chars),
            FORMAT_DIRECTIVE
        ));

        prompt
    }

    /// Prompt for a plain, non-sectioned summary (used per chunk)
    pub fn plain(&self, text: &str, context: ContextProfile) -> String {
        format!(
            "{}\n\nDocument to summarize:\n{}\n\nProvide a clear, well-structured summary in plain prose without section headers.\n",
            context.instruction(),
            truncate_chars(text, self.max_input_chars)
        )
    }

    /// Prompt rewriting an existing summary text
    pub fn refinement(&self, text: &str, instruction: &RefineInstruction) -> String {
        let text = truncate_chars(text, self.max_input_chars);
        match instruction {
            RefineInstruction::Shorten => format!(
                "Make this summary significantly shorter (about 50% reduction) while retaining the most critical facts:\n\n{}\n\nProvide only the shortened version.\n",
                text
            ),
            RefineInstruction::Clarify => format!(
                "Improve this summary by:\n- Enhancing clarity\n- Removing redundancy\n- Making it more professional\n- Keeping the same length\n\nOriginal summary:\n{}\n\nProvide only the refined version.\n",
                text
            ),
            RefineInstruction::Expand => format!(
                "Expand this summary with more details, examples, and explanations:\n\n{}\n\nProvide only the detailed version.\n",
                text
            ),
            RefineInstruction::Focus(aspect) => format!(
                "Rewrite this summary with focus on: {}\n\n{}\n\nProvide only the focused version.\n",
                aspect, text
            ),
        }
    }

    /// Prompt asking for a comma-separated keyword list
    pub fn keywords(&self, text: &str, top_n: usize) -> String {
        format!(
            "Extract the {} most important keywords or key phrases from this document.\nReturn ONLY a comma-separated list, no explanations.\n\nDocument:\n{}\n\nKeywords:",
            top_n,
            truncate_chars(text, self.keyword_input_chars)
        )
    }
}
