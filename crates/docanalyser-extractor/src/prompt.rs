//! LLM prompt construction for evidence extraction

use docanalyser_domain::{ChatMessage, RequirementDescriptor};

const DEFAULT_SOURCE_NAME: &str = "document";

/// Builds the general extraction exchange
pub struct GeneralPrompt<'a> {
    document_text: &'a str,
    source_name: Option<&'a str>,
    focus: Option<&'a str>,
    max_items: usize,
}

impl<'a> GeneralPrompt<'a> {
    /// Create a new prompt over already concatenated document text
    pub fn new(document_text: &'a str) -> Self {
        Self {
            document_text,
            source_name: None,
            focus: None,
            max_items: crate::config::DEFAULT_MAX_ITEMS,
        }
    }

    /// Name the sources in the user message
    pub fn with_source(mut self, source_name: &'a str) -> Self {
        self.source_name = Some(source_name);
        self
    }

    /// Add user-supplied focus areas
    pub fn with_focus(mut self, focus: Option<&'a str>) -> Self {
        self.focus = focus.filter(|f| !f.trim().is_empty());
        self
    }

    /// Bound the number of evidence entries requested
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Build the system and user messages
    pub fn build(&self) -> Vec<ChatMessage> {
        let source = source_or_default(self.source_name);

        let mut user = format!("Source: {}.\n\n", source);
        if let Some(focus) = self.focus {
            user.push_str(&format!("Focus areas provided by user: {}\n\n", focus));
        }
        user.push_str(
            "Extract evidence and return the JSON object described in the system message.\n\
             Only include claims supported by the text.",
        );
        user.push_str("\n\n");
        user.push_str(self.document_text);

        vec![
            ChatMessage::system(GENERAL_SYSTEM_PROMPT.replace("{max_items}", &self.max_items.to_string())),
            ChatMessage::user(user),
        ]
    }
}

/// Builds the exchange for a single requirement
pub struct RequirementPrompt<'a> {
    document_text: &'a str,
    requirement: &'a RequirementDescriptor,
    source_name: Option<&'a str>,
}

impl<'a> RequirementPrompt<'a> {
    /// Create a new prompt for one requirement
    pub fn new(document_text: &'a str, requirement: &'a RequirementDescriptor) -> Self {
        Self {
            document_text,
            requirement,
            source_name: None,
        }
    }

    /// Name the sources in the user message
    pub fn with_source(mut self, source_name: &'a str) -> Self {
        self.source_name = Some(source_name);
        self
    }

    /// Example reply object shown to the model
    pub fn schema_hint(&self) -> String {
        let quote = |s: &str| serde_json::Value::String(s.to_string()).to_string();
        format!(
            "{{\n  \"requirementId\": {},\n  {}: true,\n  \"snippet\": \"Verbatim quote or text excerpt proving the requirement\",\n  \"citation\": \"Page number, e.g., 'Page 3' (empty if unknown)\",\n  \"confidence\": \"high|medium|low\"\n}}",
            quote(&self.requirement.id),
            quote(self.requirement.response_field()),
        )
    }

    /// Build the system and user messages
    pub fn build(&self) -> Vec<ChatMessage> {
        let system = format!(
            "You are Document-Analyser. Check if the document contains the required information.\n\
             Return a JSON object (not an array) with these fields:\n\
             {}\n\
             Use camelCase keys. Do not include markdown. Set the boolean field to true if the document \
             contains the required information, otherwise false. \
             Snippet must be the quote/excerpt you used. \
             Citation must be the page number (e.g., \"Page 2\") if available, otherwise empty. \
             If no evidence exists, set the boolean field to false, snippet and citation to empty strings, \
             and confidence to \"low\".",
            self.schema_hint()
        );

        let user = format!(
            "Source: {}.\nRequirement: {} ({}).\nInstruction: {}\n\nReturn only the JSON object.\n\n{}",
            source_or_default(self.source_name),
            self.requirement.display_name(),
            self.requirement.id,
            self.requirement.instruction,
            self.document_text,
        );

        vec![ChatMessage::system(system), ChatMessage::user(user)]
    }
}

fn source_or_default(source_name: Option<&str>) -> &str {
    match source_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => DEFAULT_SOURCE_NAME,
    }
}

const GENERAL_SYSTEM_PROMPT: &str = r#"You are Document-Analyser, a careful assistant that extracts compliance evidence from unstructured documents
such as source code, security policies, and reports. Work step by step, focus on verifiable statements, and
prefer quoting the original phrasing where possible.

Produce a compact JSON object with these keys:
- document_summary: 2 sentence overview of the document content and purpose.
- evidence: list of up to {max_items} evidence objects. Each evidence object must contain:
  - title: short label for the requirement, control, or claim.
  - evidence: concise statement derived from the document.
  - snippet: verbatim quote or text excerpt used to support the evidence (keep it short).
  - citation: page number hint for the snippet, e.g., "Page 3". Leave empty if unknown.
  - confidence: one of ["high", "medium", "low"] describing certainty.
- gaps: list of missing information or unresolved questions, may be empty.

Keep the JSON machine-readable and avoid markdown."#;
