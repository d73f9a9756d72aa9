//! Normalización de texto
//!
//! Limpieza de los valores que vienen del formulario y del geocoder
//! antes de guardarlos o de agruparlos en el dashboard.

/// Quita espacios y pone en mayúscula la primera letra de cada palabra.
///
/// Una letra es inicial de palabra cuando el carácter anterior no es
/// alfabético, así que "d'ávila" queda "D'Ávila" y "44000-000" no cambia.
pub fn normalize_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.trim().chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Un campo opcional vacío se guarda como ausente, nunca como "".
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Devuelve solo el nombre del archivo, sin directorios.
pub fn file_name_only(value: &str) -> String {
    value
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  rua x "), "Rua X");
        assert_eq!(normalize_text("AVENIDA GETÚLIO VARGAS"), "Avenida Getúlio Vargas");
        assert_eq!(normalize_text("d'ávila"), "D'Ávila");
        assert_eq!(normalize_text("44000-000"), "44000-000");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(Some("   ".into())), None);
        assert_eq!(blank_to_none(None), None);
        assert_eq!(blank_to_none(Some(" 12 ".into())), Some("12".into()));
    }

    #[test]
    fn test_file_name_only() {
        assert_eq!(file_name_only("C:\\fotos\\parada.jpg"), "parada.jpg");
        assert_eq!(file_name_only("/tmp/uploads/p1.png"), "p1.png");
        assert_eq!(file_name_only("foto.jpeg"), "foto.jpeg");
    }
}
