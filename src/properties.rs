//! Typed key/value metadata attached to tiles, objects, layers, maps and tilesets.

/// Value of a custom property. Tiled stores every number as a JSON number, so ints and
/// floats share one arm.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `int`, `float` and `object` properties.
    Number(f64),
    /// `bool` properties.
    Bool(bool),
    /// `string`, `file` and `color` properties.
    String(String),
}

/// One custom property as written by Tiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name, unique per owner in practice but not enforced.
    pub name: String,
    /// The Tiled `type` field (`"bool"`, `"int"`, `"string"`, ...).
    pub declared_type: Option<String>,
    /// The Tiled `propertytype` field, set for custom enum/class types.
    pub property_type: Option<String>,
    /// Parsed value.
    pub value: PropertyValue,
}

impl Property {
    /// Shorthand for an untyped property, mostly useful in tests and tools.
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            property_type: None,
            value,
        }
    }

    /// Returns the value if this is a bool property.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            PropertyValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value if this is a numeric property.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            PropertyValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value if this is a string property.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered property list. Lookups return the first property with a matching name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    items: Vec<Property>,
}

impl Properties {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property, keeping source order.
    pub fn push(&mut self, property: Property) {
        self.items.push(property);
    }

    /// First property called `name`.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.items.iter().find(|p| p.name == name)
    }

    /// Bool value of `name`, `None` if missing or of another kind.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Property::as_bool)
    }

    /// Numeric value of `name`.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Property::as_f64)
    }

    /// Numeric value of `name` if it is a whole number that fits an `i64`.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        let n = self.get_f64(name)?;
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            Some(n as i64)
        } else {
            None
        }
    }

    /// String value of `name`.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Property::as_str)
    }

    /// Iterates in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.items.iter()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no properties.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
