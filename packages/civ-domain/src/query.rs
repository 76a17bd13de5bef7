const LABEL_PLACEHOLDER: &str = "{label}";

/// Expands each template with the entity label, preserving template order.
pub fn build_queries(templates: &[String], label: &str) -> Vec<String> {
	let label = label.trim();

	templates.iter().map(|template| template.replace(LABEL_PLACEHOLDER, label)).collect()
}
