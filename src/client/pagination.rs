use serde_json::{Map, Value};

/// Acumulador de respostas paginadas
///
/// Todas as páginas precisam ter o mesmo formato do primeiro: array (listagens)
/// ou objeto com `items` (busca).
#[derive(Debug, Clone, PartialEq)]
pub enum PagedResult {
    Array(Vec<Value>),
    Items(Map<String, Value>),
}

/// Página com formato incompatível com o acumulado
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMismatch(pub Value);

impl PagedResult {
    /// Começa a acumulação a partir da primeira página
    pub fn start(first: Value) -> Result<Self, ShapeMismatch> {
        match first {
            Value::Array(items) => Ok(Self::Array(items)),
            Value::Object(map) if matches!(map.get("items"), Some(Value::Array(_))) => {
                Ok(Self::Items(map))
            }
            other => Err(ShapeMismatch(other)),
        }
    }

    /// Concatena a próxima página ao acumulado
    pub fn merge(&mut self, page: Value) -> Result<(), ShapeMismatch> {
        match (self, page) {
            (Self::Array(acc), Value::Array(items)) => {
                acc.extend(items);
                Ok(())
            }
            (Self::Items(acc), Value::Object(mut map)) => {
                let Some(Value::Array(items)) = map.remove("items") else {
                    return Err(ShapeMismatch(Value::Object(map)));
                };
                if let Some(Value::Array(acc_items)) = acc.get_mut("items") {
                    acc_items.extend(items);
                }
                Ok(())
            }
            (_, other) => Err(ShapeMismatch(other)),
        }
    }

    /// Quantidade de elementos acumulados
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Items(map) => map
                .get("items")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Array(items) => Value::Array(items),
            Self::Items(map) => Value::Object(map),
        }
    }
}
