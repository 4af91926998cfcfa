use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    exception_private::{ExcType, exception_str},
    object::Object,
};

/// An exception that escaped a run, with everything needed to report it.
///
/// Owned and registry-independent: the class is identified by name and MRO names,
/// with `exc_type` giving the nearest builtin ancestor. `Display` renders a Python
/// style traceback including chained causes and contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    exc_type: ExcType,
    type_name: String,
    mro: Vec<String>,
    args: Vec<Object>,
    traceback: Vec<StackFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<Box<Self>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<Box<Self>>,
    #[serde(default)]
    suppress_context: bool,
}

/// One line of a traceback: the file and the frame name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub filename: String,
    pub frame_name: String,
}

impl StackFrame {
    #[must_use]
    pub fn new(filename: &str, frame_name: &str) -> Self {
        Self {
            filename: filename.to_owned(),
            frame_name: frame_name.to_owned(),
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  File \"{}\", in {}", self.filename, self.frame_name)
    }
}

impl Exception {
    #[expect(clippy::too_many_arguments, reason = "mirrors every field of a live exception")]
    #[must_use]
    pub(crate) fn new_full(
        exc_type: ExcType,
        type_name: String,
        mro: Vec<String>,
        args: Vec<Object>,
        traceback: Vec<StackFrame>,
        cause: Option<Box<Self>>,
        context: Option<Box<Self>>,
        suppress_context: bool,
    ) -> Self {
        Self {
            exc_type,
            type_name,
            mro,
            args,
            traceback,
            cause,
            context,
            suppress_context,
        }
    }

    /// Creates a builtin exception with a single message and no traceback.
    #[must_use]
    pub fn new(exc_type: ExcType, message: impl Into<String>) -> Self {
        let mut mro: Vec<String> = exc_type.mro().into_iter().map(|t| t.to_string()).collect();
        mro.push("object".to_owned());
        Self {
            exc_type,
            type_name: exc_type.to_string(),
            mro,
            args: vec![Object::String(message.into())],
            traceback: Vec::new(),
            cause: None,
            context: None,
            suppress_context: false,
        }
    }

    #[must_use]
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ExcType::RuntimeError, message)
    }

    /// Nearest builtin exception type of the raised class.
    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    /// Name of the raised class (a user class name or a builtin name).
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Class names of the raised class's MRO, class first, ending with `object`.
    #[must_use]
    pub fn mro(&self) -> &[String] {
        &self.mro
    }

    #[must_use]
    pub fn args(&self) -> &[Object] {
        &self.args
    }

    /// Frames from outermost to innermost ("most recent call last").
    #[must_use]
    pub fn traceback(&self) -> &[StackFrame] {
        &self.traceback
    }

    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    #[must_use]
    pub fn context(&self) -> Option<&Self> {
        self.context.as_deref()
    }

    /// Returns true if an instance of the raised class is an instance of a class called `name`.
    #[must_use]
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.mro.iter().any(|n| n == name)
    }

    /// `str(e)` of the raised instance.
    #[must_use]
    pub fn message(&self) -> String {
        exception_str(self.exc_type, &self.args)
    }

    /// Serializes the exception report, chained exceptions included, as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The last traceback line: `Type: message`, or just `Type` when the message is empty.
    #[must_use]
    pub fn summary(&self) -> String {
        let message = self.message();
        if message.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}: {message}", self.type_name)
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cause) = &self.cause {
            write!(
                f,
                "{cause}\n\nThe above exception was the direct cause of the following exception:\n\n"
            )?;
        } else if let Some(context) = &self.context
            && !self.suppress_context
        {
            write!(
                f,
                "{context}\n\nDuring handling of the above exception, another exception occurred:\n\n"
            )?;
        }
        if !self.traceback.is_empty() {
            writeln!(f, "Traceback (most recent call last):")?;
            for frame in &self.traceback {
                writeln!(f, "{frame}")?;
            }
        }
        f.write_str(&self.summary())
    }
}

impl std::error::Error for Exception {}
