// Generated by wsdl2rs. Do not edit manually.
#![allow(unused_imports, non_snake_case, clippy::redundant_static_lifetimes)]

use serde::{Deserialize, Serialize};
use wsdl2rs::runtime::{CallError, IntoArgument, Transport, Value};

/// Message type `Base`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Base {
    /// integer
    #[serde(default, rename = "MY-VALUE")]
    pub MYVALUE: Option<i64>,
}

impl Base {
    /// Wire-level property names paired with their field names.
    pub const PROPERTY_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("MY-VALUE", "MYVALUE"),
    ];

    /// Reads a property by its wire name or its field name.
    pub fn get_property(&self, name: &str) -> Option<serde_json::Value> {
        wsdl2rs::runtime::get_property(self, Self::PROPERTY_ALIASES, name)
    }

    /// Writes a property by its wire name or its field name.
    pub fn set_property(&mut self, name: &str, value: serde_json::Value) -> Result<(), CallError> {
        wsdl2rs::runtime::set_property(self, Self::PROPERTY_ALIASES, name, value)
    }
}

impl IntoArgument for Base {
    fn into_argument(self) -> Result<Value, CallError> {
        Value::message(&self)
    }
}

/// Message type `Derived`, extends [`Base`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Derived {
    #[serde(flatten)]
    pub base: Base,
    /// string
    #[serde(default, rename = "LABEL-X")]
    pub LABELX: Option<String>,
    /// string[]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl std::ops::Deref for Derived {
    type Target = Base;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl std::ops::DerefMut for Derived {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl Derived {
    /// Wire-level property names paired with their field names.
    pub const PROPERTY_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("LABEL-X", "LABELX"),
        ("MY-VALUE", "MYVALUE"),
    ];

    /// Reads a property by its wire name or its field name.
    pub fn get_property(&self, name: &str) -> Option<serde_json::Value> {
        wsdl2rs::runtime::get_property(self, Self::PROPERTY_ALIASES, name)
    }

    /// Writes a property by its wire name or its field name.
    pub fn set_property(&mut self, name: &str, value: serde_json::Value) -> Result<(), CallError> {
        wsdl2rs::runtime::set_property(self, Self::PROPERTY_ALIASES, name, value)
    }
}

impl IntoArgument for Derived {
    fn into_argument(self) -> Result<Value, CallError> {
        Value::message(&self)
    }
}

/// Client for the `Catalog` service.
pub struct Catalog<T> {
    transport: T,
}

#[allow(non_snake_case)]
impl<T: Transport> Catalog<T> {
    /// Wire-level class names mapped to their generated types.
    pub const CLASSMAP: &'static [(&'static str, &'static str)] = &[
        ("Base", "Base"),
        ("Derived", "Derived"),
    ];

    /// Location advertised by the service description.
    pub const LOCATION: &'static str = "http://example.test/catalog";

    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls `Find`.
    ///
    /// Valid parameter combinations:
    /// - `(string)`
    /// - `(integer)(string)`
    ///
    /// Returns `Derived` or `Derived[]`.
    pub fn Find(&self, args: Vec<Value>) -> Result<Value, CallError> {
        wsdl2rs::runtime::check_arguments(&args, &["(string)", "(integer)(string)"])?;
        self.transport.call(wsdl2rs::runtime::Call {
            operation: "Find",
            arguments: args,
            classmap: Self::CLASSMAP,
        })
    }

    /// Calls `Store`.
    ///
    /// Valid parameter combinations:
    /// - `(Base)`
    pub fn Store(&self, args: Vec<Value>) -> Result<Value, CallError> {
        wsdl2rs::runtime::check_arguments(&args, &["(Base)"])?;
        self.transport.call(wsdl2rs::runtime::Call {
            operation: "Store",
            arguments: args,
            classmap: Self::CLASSMAP,
        })
    }

    /// Calls `new`.
    ///
    /// Valid parameter combinations:
    /// - no arguments
    pub fn new_(&self, args: Vec<Value>) -> Result<Value, CallError> {
        wsdl2rs::runtime::check_arguments(&args, &[""])?;
        self.transport.call(wsdl2rs::runtime::Call {
            operation: "new",
            arguments: args,
            classmap: Self::CLASSMAP,
        })
    }

    /// Calls `new_`.
    ///
    /// Valid parameter combinations:
    /// - no arguments
    pub fn new_2(&self, args: Vec<Value>) -> Result<Value, CallError> {
        wsdl2rs::runtime::check_arguments(&args, &[""])?;
        self.transport.call(wsdl2rs::runtime::Call {
            operation: "new_",
            arguments: args,
            classmap: Self::CLASSMAP,
        })
    }
}
