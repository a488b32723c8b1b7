//! Constantes estables del motor de sesiones.

/// Versión lógica del motor; participa en el hash de definición del flujo.
pub const ENGINE_VERSION: u32 = 1;

/// Techo de reintentos consecutivos en un mismo paso. El rechazo número
/// `MAX_RETRIES + 1` termina la sesión en fallo.
pub const MAX_RETRIES: u32 = 5;
