/// A named integer constant injected into shaders and cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyDefine {
    pub name: String,
    pub value: i64,
}

impl KeyDefine {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl std::fmt::Display for KeyDefine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}

/// A shader preprocessor define: either a bare token or a name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Define {
    Flag(String),
    Value(KeyDefine),
}

impl Define {
    pub fn flag(name: impl Into<String>) -> Self {
        Self::Flag(name.into())
    }

    pub fn value(name: impl Into<String>, value: i64) -> Self {
        Self::Value(KeyDefine::new(name, value))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Flag(name) => name,
            Self::Value(define) => &define.name,
        }
    }

    /// The `#define` line for this define, without a trailing newline.
    pub fn directive(&self) -> String {
        match self {
            Self::Flag(name) => format!("#define {name}"),
            Self::Value(define) => format!("#define {} {}", define.name, define.value),
        }
    }
}

impl std::fmt::Display for Define {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(name) => f.write_str(name),
            Self::Value(define) => define.fmt(f),
        }
    }
}

impl From<KeyDefine> for Define {
    fn from(define: KeyDefine) -> Self {
        Self::Value(define)
    }
}

impl From<&str> for Define {
    fn from(name: &str) -> Self {
        Self::Flag(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_define_display() {
        assert_eq!(KeyDefine::new("IN_POSITION", 0).to_string(), "IN_POSITION:0");
    }

    #[test]
    fn directives() {
        assert_eq!(Define::flag("USE_FOG").directive(), "#define USE_FOG");
        assert_eq!(
            Define::value("WORKGROUP_SIZE", 512).directive(),
            "#define WORKGROUP_SIZE 512"
        );
    }

    #[test]
    fn names_and_display() {
        let d: Define = KeyDefine::new("N", -3).into();
        assert_eq!(d.name(), "N");
        assert_eq!(d.to_string(), "N:-3");
        assert_eq!(Define::from("TRIANGLES").to_string(), "TRIANGLES");
    }
}
