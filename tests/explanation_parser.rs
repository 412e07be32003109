use intake_gateway::assessments::{parse_explanation, Item};

#[test]
fn empty_and_blank_input_yield_zero_sections() {
    assert!(parse_explanation("").is_empty());
    assert!(parse_explanation("   \n\n").is_empty());
}

#[test]
fn structural_example_from_the_intake_contract() {
    let text = "**Important Health Alert**\n\
                1. ST Slope Up: flat slope increases risk.\n\
                \t* confirmed by ECG\n\
                2. Chest Pain Type";

    let document = parse_explanation(text);
    assert_eq!(document.sections.len(), 1);

    let section = &document.sections[0];
    assert_eq!(section.heading, "Important Health Alert");
    assert_eq!(section.items.len(), 2);

    let Item::Numbered { text, subitems } = &section.items[0] else {
        panic!("first item must be numbered");
    };
    assert_eq!(text, "ST Slope Up: flat slope increases risk.");
    assert_eq!(subitems, &vec!["confirmed by ECG".to_string()]);

    let Item::Numbered { subitems, .. } = &section.items[1] else {
        panic!("second item must be numbered");
    };
    assert!(subitems.is_empty());
}

#[test]
fn orphan_sub_bullet_is_dropped() {
    assert!(parse_explanation("\t* orphan bullet").is_empty());
}

#[test]
fn prose_with_no_heading_yields_an_empty_document() {
    let document = parse_explanation("No report generated for this prediction.");
    assert!(document.is_empty());
}

#[test]
fn parses_a_full_generated_report() {
    let text = "**Important Health Alert: Heart Disease Risk**\n\n\
        Based on your medical data, our analysis predicts a 70.24% probability of Heart Disease.\n\n\
        **Top Contributing Factors:**\n\n\
        1. **ST Slope Up**: Your electrocardiogram (ECG) results show a flat ST slope.\n\
        2. **Chest Pain Type (ASY)**: You have reported asymptomatic chest pain.\n\n\
        **What You Can Do Next:**\n\n\
        1. **Schedule a Doctor's Appointment**: Consult with your primary care physician.\n\
        2. **Lifestyle Changes**: Make healthy lifestyle adjustments:\n\
        \t* Quit smoking (if applicable)\n\
        \t* Engage in regular physical activity (aim for 150 minutes/week)\n\
        \t* Maintain a healthy diet (low in sodium, sugar, and saturated fats)\n\n\
        Remember, a predicted probability of 70.24% is a significant risk, but it's not a guarantee.";

    let document = parse_explanation(text);
    assert_eq!(document.sections.len(), 3);

    assert_eq!(
        document.sections[0].heading,
        "Important Health Alert: Heart Disease Risk"
    );
    assert_eq!(document.sections[0].items.len(), 1);
    assert!(matches!(
        document.sections[0].items[0],
        Item::Paragraph { .. }
    ));

    assert_eq!(document.sections[1].heading, "Top Contributing Factors:");
    assert_eq!(document.sections[1].items.len(), 2);

    let next_steps = &document.sections[2];
    assert_eq!(next_steps.heading, "What You Can Do Next:");
    assert_eq!(next_steps.items.len(), 3);

    let Item::Numbered { subitems, .. } = &next_steps.items[1] else {
        panic!("lifestyle changes must be a numbered item");
    };
    assert_eq!(subitems.len(), 3);
    assert_eq!(subitems[0], "Quit smoking (if applicable)");

    assert!(matches!(next_steps.items[2], Item::Paragraph { .. }));
}

#[test]
fn sections_keep_their_input_order() {
    let document = parse_explanation("**One**\n**Two**\n**Three**");
    let headings: Vec<_> = document
        .sections
        .iter()
        .map(|section| section.heading.as_str())
        .collect();
    assert_eq!(headings, vec!["One", "Two", "Three"]);
}

#[test]
fn document_serializes_with_tagged_items() {
    let document = parse_explanation("**Plan**\n*Focus*\n1. Walk\n\t* daily");
    let json = serde_json::to_value(&document).expect("document serializes");

    let items = &json["sections"][0]["items"];
    assert_eq!(items[0]["kind"], "subheading");
    assert_eq!(items[1]["kind"], "numbered");
    assert_eq!(items[1]["subitems"][0], "daily");
}
