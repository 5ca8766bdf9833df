//! Stylesheet for the builder chrome.

/// CSS for every class the builder adds, under `class_prefix`.
pub fn builder_css(class_prefix: &str) -> String {
    format!(
        r#"
.{prefix}__container {{
    position: absolute;
    top: 0;
    left: 0;
    width: 0;
    height: 0;
    z-index: 2147483600;
}}
.{prefix}__hover-outline {{
    position: absolute;
    outline: 2px dashed #6c5ce7;
    pointer-events: none;
    transition: all 0.05s ease-out;
}}
.{prefix}__hover-outline--hidden {{
    display: none;
}}
.{prefix}__overlay__wrapper {{
    display: none;
}}
.{prefix}__overlay__wrapper.{prefix}__overlay--visible {{
    display: block;
}}
.{prefix}__overlay {{
    position: absolute;
    background: rgba(0, 0, 0, 0.3);
}}
.{prefix}__cursor {{
    position: fixed;
    pointer-events: none;
    transform: translate(8px, 8px);
    padding: 2px 6px;
    border-radius: 4px;
    background: #6c5ce7;
    color: #fff;
    font: 12px/1.4 sans-serif;
}}
.{prefix}__cursor--hidden {{
    display: none;
}}
.{prefix}__cursor::after {{
    content: attr(data-cursor-state);
}}
.{prefix}__empty-block-parent--focused {{
    outline: 1px solid #6c5ce7;
}}
.{prefix}-add-instance-button {{
    position: absolute;
    transform: translate(-50%, -50%);
    width: 24px;
    height: 24px;
    border-radius: 50%;
    border: none;
    background: #6c5ce7;
    color: #fff;
    cursor: pointer;
}}
.{prefix}-add-instance-button::after {{
    content: "+";
}}
[data-cslp] {{
    cursor: none;
}}
"#,
        prefix = class_prefix,
    )
}
