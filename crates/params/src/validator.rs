//! Validator construction and the per-field rule pipeline.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::coerce;
use crate::condition::{provided, Condition};
use crate::error::{SchemaError, Violation};
use crate::field::{FieldSpec, Presence, Setter};

/// A compiled validator for one target record shape.
///
/// Built once from a list of [`FieldSpec`]s, then reused for any number
/// of parameter maps. Construction parses every rule expression and
/// cross-checks field references, so a successfully built validator can
/// only report value violations, never schema defects.
pub struct Validator<T> {
    descriptors: Vec<Descriptor<T>>,
    field_names: Vec<String>,
}

/// A compiled field: rule expressions parsed, patterns built.
struct Descriptor<T> {
    name: String,
    setter: Setter<T>,
    presence: CompiledPresence,
    matches: Option<Regex>,
    depends_on: Option<Condition>,
    precludes: Vec<String>,
}

enum CompiledPresence {
    Required,
    Optional,
    Default(String),
    RequiredIf(Condition),
    OptionalIf(Condition),
}

impl<T> Validator<T> {
    /// Compile `fields` into a reusable validator.
    pub fn new(fields: Vec<FieldSpec<T>>) -> Result<Self, SchemaError> {
        let mut names = HashSet::new();
        for spec in &fields {
            if spec.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !names.insert(spec.name.clone()) {
                return Err(SchemaError::DuplicateField(spec.name.clone()));
            }
        }

        let mut descriptors = Vec::with_capacity(fields.len());
        for spec in fields {
            descriptors.push(compile(spec, &names)?);
        }

        let field_names = descriptors.iter().map(|d| d.name.clone()).collect();
        Ok(Self {
            descriptors,
            field_names,
        })
    }

    /// The external names of every declared field, in declaration
    /// order.
    ///
    /// The validator itself ignores unrecognized keys in a parameter
    /// map; callers that want to reject them can diff against this
    /// list.
    pub fn fields(&self) -> &[String] {
        &self.field_names
    }

    /// Validate `params` and write coerced values into `target`.
    ///
    /// Fields are processed in declaration order and the first
    /// violation aborts. Population is not transactional: fields
    /// processed before the failing one keep their writes, so `target`
    /// must not be trusted after an error.
    pub fn populate(
        &self,
        params: &HashMap<String, String>,
        target: &mut T,
    ) -> Result<(), Violation> {
        for descriptor in &self.descriptors {
            populate_field(descriptor, params, target)?;
        }
        Ok(())
    }

    /// Validate `params` into a fresh `T::default()`.
    pub fn build(&self, params: &HashMap<String, String>) -> Result<T, Violation>
    where
        T: Default,
    {
        let mut target = T::default();
        self.populate(params, &mut target)?;
        Ok(target)
    }
}

fn compile<T>(spec: FieldSpec<T>, declared: &HashSet<String>) -> Result<Descriptor<T>, SchemaError> {
    let FieldSpec {
        name,
        setter,
        presence,
        matches,
        depends_on,
        precludes,
    } = spec;

    let presence = match presence {
        Presence::Required => CompiledPresence::Required,
        Presence::Optional => CompiledPresence::Optional,
        Presence::Default(value) => {
            if let Setter::Bool(_) = setter {
                coerce::parse_bool(&name, &value).map_err(|_| SchemaError::InvalidDefault {
                    field: name.clone(),
                    value: value.clone(),
                    expected: "boolean",
                })?;
            }
            CompiledPresence::Default(value)
        }
        Presence::RequiredIf(src) => {
            CompiledPresence::RequiredIf(compile_condition(&name, "required_if", &src, declared)?)
        }
        Presence::OptionalIf(src) => {
            CompiledPresence::OptionalIf(compile_condition(&name, "optional_if", &src, declared)?)
        }
    };

    let matches = match matches {
        Some(pattern) => Some(Regex::new(&pattern).map_err(|source| {
            SchemaError::InvalidPattern {
                field: name.clone(),
                pattern,
                source,
            }
        })?),
        None => None,
    };

    let depends_on = match depends_on {
        Some(src) => Some(compile_condition(&name, "depends_on", &src, declared)?),
        None => None,
    };

    for other in &precludes {
        if !declared.contains(other) {
            return Err(SchemaError::UnknownReference {
                field: name,
                reference: other.clone(),
            });
        }
    }

    Ok(Descriptor {
        name,
        setter,
        presence,
        matches,
        depends_on,
        precludes,
    })
}

fn compile_condition(
    field: &str,
    rule: &'static str,
    source: &str,
    declared: &HashSet<String>,
) -> Result<Condition, SchemaError> {
    let cond = Condition::parse(source).map_err(|source| SchemaError::InvalidCondition {
        field: field.to_string(),
        rule,
        source,
    })?;
    for name in cond.referenced_names() {
        if !declared.contains(name) {
            return Err(SchemaError::UnknownReference {
                field: field.to_string(),
                reference: name.to_string(),
            });
        }
    }
    Ok(cond)
}

fn populate_field<T>(
    d: &Descriptor<T>,
    params: &HashMap<String, String>,
    target: &mut T,
) -> Result<(), Violation> {
    let supplied = params
        .get(&d.name)
        .map(String::as_str)
        .filter(|v| !v.is_empty());

    // A default substitutes only when the caller supplied nothing;
    // conditions keep reading the raw map either way.
    let effective = match (supplied, &d.presence) {
        (None, CompiledPresence::Default(value)) => Some(value.as_str()),
        (v, _) => v,
    };

    let required = match &d.presence {
        CompiledPresence::Required => true,
        CompiledPresence::Optional | CompiledPresence::Default(_) => false,
        CompiledPresence::RequiredIf(cond) => cond.evaluate(params),
        CompiledPresence::OptionalIf(cond) => !cond.evaluate(params),
    };
    if required && effective.is_none() {
        return Err(Violation::MissingRequired {
            field: d.name.clone(),
        });
    }

    // Cross-field rules gate caller-supplied values only; a substituted
    // default skips them.
    if let Some(value) = supplied {
        for other in &d.precludes {
            if provided(params, other) {
                return Err(Violation::MutuallyExclusive {
                    field: d.name.clone(),
                    other: other.clone(),
                });
            }
        }
        if let Some(cond) = &d.depends_on {
            if !cond.evaluate(params) {
                return Err(Violation::UnmetDependency {
                    field: d.name.clone(),
                    condition: cond.source().to_string(),
                });
            }
        }
        if let Some(re) = &d.matches {
            if !re.is_match(value) {
                return Err(Violation::PatternMismatch {
                    field: d.name.clone(),
                    value: value.to_string(),
                    pattern: re.as_str().to_string(),
                });
            }
        }
    }

    match effective {
        Some(value) => coerce::assign(target, &d.name, d.setter, value),
        None => Ok(()),
    }
}
