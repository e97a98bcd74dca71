use crate::gl::Primitive;

/// Error categories for the core rendering engine.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// GL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// Misuse of the begin/end vertex recording API.
    #[error("Batch error: {0}")]
    Batch(String),
}

impl Error {
    // Shader errors
    pub(crate) fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub(crate) fn shader_compile_failed(stage: &str, log: String) -> Self {
        Self::Shader(format!("{stage} shader compilation failed: {log}"))
    }

    pub(crate) fn shader_program_creation_failed(detail: String) -> Self {
        Self::Shader(format!("Shader program creation failed: {detail}"))
    }

    pub(crate) fn shader_link_failed(log: String) -> Self {
        Self::Shader(format!("Shader linking failed: {log}"))
    }

    // Resource errors
    pub(crate) fn buffer_creation_failed(buffer_type: &str, detail: String) -> Self {
        Self::Resource(format!("Failed to create {buffer_type} buffer: {detail}"))
    }

    pub(crate) fn vertex_array_creation_failed(detail: String) -> Self {
        Self::Resource(format!("Failed to create vertex array object: {detail}"))
    }

    pub(crate) fn attrib_location_failed(name: &str) -> Self {
        Self::Resource(format!("Failed to get attribute location: {name}"))
    }

    // Batch errors
    pub(crate) fn nested_begin(open: Primitive) -> Self {
        Self::Batch(format!("begin called while {open:?} is still open"))
    }

    pub(crate) fn end_without_begin() -> Self {
        Self::Batch("end called without a matching begin".to_string())
    }

    pub(crate) fn vertex_outside_begin() -> Self {
        Self::Batch("vertex specified outside begin/end".to_string())
    }

    pub(crate) fn flush_while_open(open: Primitive) -> Self {
        Self::Batch(format!("flush called while {open:?} is still open"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_category() {
        let err = Error::shader_link_failed("undefined varying v_color".into());
        assert_eq!(
            err.to_string(),
            "Shader error: Shader linking failed: undefined varying v_color"
        );

        let err = Error::nested_begin(Primitive::Triangles);
        assert_eq!(
            err.to_string(),
            "Batch error: begin called while Triangles is still open"
        );
    }
}
