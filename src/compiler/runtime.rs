use crate::ast::types::Type;

/// Entry points of the runtime library linked with every program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFunction {
    PrintInteger,
    PrintBoolean,
    PrintCharacter,
    PrintString,
    IntegerPower,
}

impl RuntimeFunction {
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeFunction::PrintInteger => "print_integer",
            RuntimeFunction::PrintBoolean => "print_boolean",
            RuntimeFunction::PrintCharacter => "print_character",
            RuntimeFunction::PrintString => "print_string",
            RuntimeFunction::IntegerPower => "integer_power",
        }
    }

    /// The print routine for values of type `ty`, if it can be printed.
    pub fn print_for(ty: &Type) -> Option<RuntimeFunction> {
        match ty {
            Type::Integer => Some(RuntimeFunction::PrintInteger),
            Type::Boolean => Some(RuntimeFunction::PrintBoolean),
            Type::Character => Some(RuntimeFunction::PrintCharacter),
            Type::String => Some(RuntimeFunction::PrintString),
            _ => None,
        }
    }
}
