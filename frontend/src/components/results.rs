use super::super::Model;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    if model.submission.is_submitting() {
        return html! {
            <div class="loading-preview">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p style="margin-left: 10px;">{"Recognizing food..."}</p>
            </div>
        };
    }

    let Some(result) = model.submission.result() else {
        return html! {};
    };

    let food_name = result.food_name.as_deref().unwrap_or("Unknown food");

    html! {
        <div class="results-container">
            <div class="result-header">
                <h2><i class="fa-solid fa-bowl-food"></i>{ format!(" {}", food_name) }</h2>
                if let Some(message) = &result.message {
                    <p class="result-message">{ message.clone() }</p>
                }
            </div>
            <div class="detailed-results">
                <h3>{"Nutrition Facts"}</h3>
                <table class="nutrition-table">
                    <tbody>
                        { for result.nutrition.rows().map(|(nutrient, value)| html! {
                            <tr class="result-item">
                                <td class="result-label">{ nutrient.to_string() }</td>
                                <td class="result-value">{ nutrient.format_value(value) }</td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
