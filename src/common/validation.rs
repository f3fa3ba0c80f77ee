use rust_decimal::Decimal;
use validator::ValidationError;

/// Maior valor que cabe em `NUMERIC(10,2)`.
pub const VALOR_MAXIMO: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Campos obrigatórios são gravados sem espaços nas pontas, então só espaços conta como vazio.
/// A mensagem vem do atributo `message` de cada campo.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Valores monetários: não negativos, até duas casas e dentro de `NUMERIC(10,2)`.
pub fn valor_monetario(value: &Decimal) -> Result<(), ValidationError> {
    let (code, message) = if value.is_sign_negative() && !value.is_zero() {
        ("negative_value", "O valor não pode ser negativo.")
    } else if value.normalize().scale() > 2 {
        ("too_many_decimals", "O valor deve ter no máximo duas casas decimais.")
    } else if *value > VALOR_MAXIMO {
        ("value_too_large", "O valor não pode ser maior que 99999999.99.")
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}
