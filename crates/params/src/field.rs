//! Field rule declarations.
//!
//! A [`FieldSpec`] couples a parameter's external name with a setter
//! into the target record and the rules its value must satisfy. Specs
//! carry rule expressions as raw strings; [`Validator::new`] compiles
//! and cross-checks them.
//!
//! [`Validator::new`]: crate::Validator::new

/// Declares one parameter of a target record.
///
/// ```
/// use sharekit_params::FieldSpec;
///
/// struct Opts {
///     protocol: String,
///     backend: String,
/// }
///
/// let fields = vec![
///     FieldSpec::text("protocol", |o: &mut Opts, v| o.protocol = v)
///         .matches("^(?i)cephfs|nfs$"),
///     FieldSpec::text("backend", |o: &mut Opts, v| o.backend = v).optional(),
/// ];
/// assert_eq!(fields.len(), 2);
/// ```
pub struct FieldSpec<T> {
    pub(crate) name: String,
    pub(crate) setter: Setter<T>,
    pub(crate) presence: Presence,
    pub(crate) matches: Option<String>,
    pub(crate) depends_on: Option<String>,
    pub(crate) precludes: Vec<String>,
}

/// Writes a coerced value into the target record.
///
/// Setters are plain function pointers so a compiled validator stays
/// `Send + Sync` for any target type.
pub(crate) enum Setter<T> {
    Text(fn(&mut T, String)),
    Bool(fn(&mut T, bool)),
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Setter<T> {}

/// How a field's presence is enforced. New specs start out `Required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    Optional,
    Default(String),
    RequiredIf(String),
    OptionalIf(String),
}

impl<T> FieldSpec<T> {
    /// A text parameter, assigned to the target verbatim.
    ///
    /// String newtype fields use this constructor with a setter that
    /// applies the wrapper.
    pub fn text(name: &str, set: fn(&mut T, String)) -> Self {
        Self::new(name, Setter::Text(set))
    }

    /// A boolean parameter, accepting exactly `true` or `false`.
    pub fn boolean(name: &str, set: fn(&mut T, bool)) -> Self {
        Self::new(name, Setter::Bool(set))
    }

    fn new(name: &str, setter: Setter<T>) -> Self {
        Self {
            name: name.to_string(),
            setter,
            presence: Presence::Required,
            matches: None,
            depends_on: None,
            precludes: Vec::new(),
        }
    }

    /// The parameter must carry a non-empty value. This is already the
    /// default for a new spec.
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// The parameter may be omitted.
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// The parameter may be omitted; `value` is assigned in its place.
    ///
    /// A default is substituted verbatim and carries none of the
    /// cross-field rules a caller-supplied value would.
    pub fn default_value(mut self, value: &str) -> Self {
        self.presence = Presence::Default(value.to_string());
        self
    }

    /// The parameter is required when `condition` holds, optional
    /// otherwise.
    pub fn required_if(mut self, condition: &str) -> Self {
        self.presence = Presence::RequiredIf(condition.to_string());
        self
    }

    /// The parameter is optional when `condition` holds, required
    /// otherwise.
    pub fn optional_if(mut self, condition: &str) -> Self {
        self.presence = Presence::OptionalIf(condition.to_string());
        self
    }

    /// A supplied value must match `pattern` (unanchored).
    pub fn matches(mut self, pattern: &str) -> Self {
        self.matches = Some(pattern.to_string());
        self
    }

    /// A supplied value is only accepted when `condition` holds.
    pub fn depends_on(mut self, condition: &str) -> Self {
        self.depends_on = Some(condition.to_string());
        self
    }

    /// A supplied value is rejected when any of `fields` is also
    /// supplied.
    pub fn precludes(mut self, fields: &[&str]) -> Self {
        self.precludes = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}
