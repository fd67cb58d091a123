// Fixed operand names used in emitted IR

/// Placeholder temporaries. Every value of a given role shares one name
/// across the whole program; nothing is numbered or made unique.
pub const TEMP_VAR: &str = "temp_var";
pub const TEMP_LITERAL: &str = "temp_literal";
pub const TEMP_RESULT: &str = "temp_result";
pub const TEMP_FUNC_NAME: &str = "temp_func_name";
pub const TEMP_PARAM: &str = "temp_param";
pub const TEMP_CONDITION: &str = "temp_condition";
pub const TEMP_KEY: &str = "temp_key";
pub const TEMP_VALUE: &str = "temp_value";
pub const TEMP_PAIR: &str = "temp_pair";
pub const TEMP_ARRAY: &str = "temp_array";
pub const TEMP_INDEX: &str = "temp_index";
pub const TEMP_ELEMENT: &str = "temp_element";

/// Labels. Like the temporaries they are reused by every if and loop.
pub const LABEL_ELSE: &str = "label_else";
pub const LABEL_END_IF: &str = "label_end_if";
pub const LOOP_START: &str = "loop_start";
pub const LOOP_END: &str = "loop_end";

/// Separator between parameter placeholders in a `call_function` operand
pub const PARAM_SEPARATOR: &str = ", ";
