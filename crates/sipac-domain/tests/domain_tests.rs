use serde_json::json;
use sipac_domain::{AnswerSet, AnswerValue, AssetRecord, Catalogs};

#[test]
fn asset_record_roundtrips_through_json() {
    let cats = Catalogs::builtin();
    let rec = AssetRecord::new(cats, 3, "Tienda online", 5, "Capital tecnológico").unwrap();
    let value = serde_json::to_value(&rec).unwrap();
    assert_eq!(
        value,
        json!({
            "tipo_generico": 3,
            "activo_especifico": "Tienda online",
            "importancia": 5,
            "tipo_ci": "Capital tecnológico"
        })
    );
}

#[test]
fn answer_set_serializes_flat_like_collected_data() {
    let cats = Catalogs::builtin();
    let mut answers = AnswerSet::new();
    answers.register(
        "objetivo_negocio",
        AnswerValue::Text("Ampliar el alcance de la empresa".into()),
    );
    answers.register(
        "activos",
        AnswerValue::Assets(vec![AssetRecord::new(
            cats,
            3,
            "Tienda online",
            5,
            "capital tecnológico",
        )
        .unwrap()]),
    );

    let value = serde_json::to_value(&answers).unwrap();
    assert_eq!(value["objetivo_negocio"], "Ampliar el alcance de la empresa");
    assert_eq!(value["tipo_generico"], json!([3]));
    assert_eq!(value["activo_especifico"], json!(["Tienda online"]));
    assert_eq!(value["importancia_activo"], json!([5]));
    assert_eq!(value["tipo_CI_Intellectus"], json!(["Capital tecnológico"]));
}

#[test]
fn injected_catalog_drives_validation() {
    let doc = json!({
        "gia": { "1": "Modelo único" },
        "ci": { "1": ["Capital humano"] }
    });
    let cats = Catalogs::from_json(&doc).unwrap();
    assert!(AssetRecord::new(&cats, 1, "Plan de formación", 3, "capital humano").is_ok());
    assert!(AssetRecord::new(&cats, 2, "Plan de formación", 3, "capital humano").is_err());
}
