//! Command execution against the record service.

use crate::command::{parse_line, Command};
use hbnb_core::{FieldInput, FieldValue, RecordService, RecordStore, StoreError};
use log::{debug, error};
use serde_json::{Map, Value};
use std::io::{self, Write};

const CLASS_MISSING: &str = "** class name missing **";
const CLASS_UNKNOWN: &str = "** class doesn't exist **";
const ID_MISSING: &str = "** instance id missing **";
const NO_INSTANCE: &str = "** no instance found **";
const ATTRIBUTE_MISSING: &str = "** attribute name missing **";
const VALUE_MISSING: &str = "** value missing **";

/// Interactive front-end owning the record service.
pub struct Console<S: RecordStore> {
    service: RecordService<S>,
}

impl<S: RecordStore> Console<S> {
    pub fn new(service: RecordService<S>) -> Self {
        Self { service }
    }

    #[cfg(test)]
    pub fn service(&self) -> &RecordService<S> {
        &self.service
    }

    /// Runs one input line, writing user-facing output to `out`.
    ///
    /// Returns `Ok(false)` when the console should stop. A storage failure
    /// (`Io` or `Encode`) is returned as an error: memory has been rolled
    /// back, but the durable file can no longer be trusted to follow.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let command = parse_line(line);
        if let Command::Unknown(_) = command {
            debug!("event=command module=console status=error error_code=unknown_syntax");
        }

        match command {
            Command::Empty => {}
            Command::Quit => return Ok(false),
            Command::Create { class } => {
                let Some(class) = class else {
                    return message(out, CLASS_MISSING);
                };
                match self.service.create(&class) {
                    Ok(id) => writeln!(out, "{id}")?,
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Show { class, id } => {
                let (class, id) = match self.require_class_and_id(class, id) {
                    Ok(pair) => pair,
                    Err(text) => return message(out, text),
                };
                match self.service.show(&class, &id) {
                    Ok(record) => writeln!(out, "{record}")?,
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Destroy { class, id } => {
                let (class, id) = match self.require_class_and_id(class, id) {
                    Ok(pair) => pair,
                    Err(text) => return message(out, text),
                };
                if let Err(err) = self.service.destroy(&class, &id) {
                    report(out, &err)?;
                }
            }
            Command::All { class } => match self.service.all(class.as_deref()) {
                Ok(records) => {
                    let rendered: Vec<String> =
                        records.iter().map(|record| record.to_string()).collect();
                    writeln!(out, "[{}]", rendered.join(", "))?;
                }
                Err(err) => report(out, &err)?,
            },
            Command::Count { class } => {
                let Some(class) = class else {
                    return message(out, CLASS_MISSING);
                };
                match self.service.count(&class) {
                    Ok(count) => writeln!(out, "{count}")?,
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Update {
                class,
                id,
                attribute,
                value,
            } => {
                let (class, id) = match self.require_class_and_id(class, id) {
                    Ok(pair) => pair,
                    Err(text) => return message(out, text),
                };
                if let Err(err) = self.service.show(&class, &id) {
                    return report(out, &err).map(|()| true);
                }
                let Some(attribute) = attribute else {
                    return message(out, ATTRIBUTE_MISSING);
                };
                let Some(value) = value else {
                    return message(out, VALUE_MISSING);
                };
                if let Err(err) = self.service.update(&class, &id, &attribute, &value) {
                    report(out, &err)?;
                }
            }
            Command::UpdateMap { class, id, fields } => {
                let inputs = match field_inputs(fields) {
                    Ok(inputs) => inputs,
                    Err(text) => return message(out, &text),
                };
                if let Err(err) = self.service.update_fields(&class, &id, inputs) {
                    report(out, &err)?;
                }
            }
            Command::Unknown(line) => writeln!(out, "*** Unknown syntax: {line}")?,
        }

        Ok(true)
    }

    /// Checks class presence and existence before the id, in that order.
    fn require_class_and_id(
        &self,
        class: Option<String>,
        id: Option<String>,
    ) -> Result<(String, String), &'static str> {
        let class = class.ok_or(CLASS_MISSING)?;
        if self.service.variant(&class).is_err() {
            return Err(CLASS_UNKNOWN);
        }
        let id = id.ok_or(ID_MISSING)?;
        Ok((class, id))
    }
}

/// String values go through the update coercion policy; other JSON values keep their type.
fn field_inputs(fields: Map<String, Value>) -> Result<Vec<(String, FieldInput)>, String> {
    let mut inputs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let input = match value {
            Value::String(text) => FieldInput::Text(text),
            other => match FieldValue::from_json(&other) {
                Some(typed) => FieldInput::Value(typed),
                None => return Err(format!("** unsupported value for {name} **")),
            },
        };
        inputs.push((name, input));
    }
    Ok(inputs)
}

fn message(out: &mut impl Write, text: &str) -> io::Result<bool> {
    writeln!(out, "{text}")?;
    Ok(true)
}

fn report(out: &mut impl Write, err: &StoreError) -> io::Result<()> {
    match err {
        StoreError::UnknownVariant(_) => writeln!(out, "{CLASS_UNKNOWN}"),
        StoreError::RecordNotFound(_) => writeln!(out, "{NO_INSTANCE}"),
        StoreError::Io(_) | StoreError::Encode(_) => {
            error!("event=command module=console status=error error_code=storage_failed");
            Err(io::Error::other(format!("storage failure: {err}")))
        }
        other => writeln!(out, "** {other} **"),
    }
}
