//! Linear six-step wizards (client setup and professional signup). Each step
//! lists its required fields; "next" is refused while any of them is empty.

use crate::domain::models::{CompanySize, CopsoqVersion};
use crate::domain::scoring::{MIN_RESPONDENTS_CEIL, MIN_RESPONDENTS_FLOOR};
use serde::{Deserialize, Serialize};

pub const FIRST_STEP: usize = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {step} is incomplete, missing: {}", .missing.join(", "))]
    StepIncomplete {
        step: usize,
        missing: Vec<&'static str>,
    },
}

pub trait WizardForm {
    /// Step titles in order; the length is the number of steps.
    const STEPS: &'static [&'static str];

    /// Names of required fields of `step` that are still empty.
    fn missing_fields(&self, step: usize) -> Vec<&'static str>;
}

#[derive(Debug, Clone)]
pub struct Wizard<F> {
    step: usize,
    form: F,
}

impl<F: WizardForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self {
            step: FIRST_STEP,
            form,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_title(&self) -> &'static str {
        F::STEPS[self.step - 1]
    }

    pub fn last_step() -> usize {
        F::STEPS.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.step == Self::last_step()
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn can_advance(&self) -> bool {
        self.form.missing_fields(self.step).is_empty()
    }

    pub fn next(&mut self) -> Result<usize, WizardError> {
        let missing = self.form.missing_fields(self.step);
        if !missing.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.step,
                missing,
            });
        }
        if self.step < Self::last_step() {
            self.step += 1;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> usize {
        if self.step > FIRST_STEP {
            self.step -= 1;
        }
        self.step
    }

    /// Validates every step, not just the current one, and hands back the form.
    pub fn submit(self) -> Result<F, WizardError> {
        validate_all(&self.form)?;
        Ok(self.form)
    }
}

pub fn validate_all<F: WizardForm>(form: &F) -> Result<(), WizardError> {
    for step in 1..=F::STEPS.len() {
        let missing = form.missing_fields(step);
        if !missing.is_empty() {
            return Err(WizardError::StepIncomplete { step, missing });
        }
    }
    Ok(())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(missing: &mut Vec<&'static str>, name: &'static str, value: &str) {
    if blank(value) {
        missing.push(name);
    }
}

// ========== Client setup ==========

pub const DEFAULT_CONSENT_TEXT: &str = "FREE AND INFORMED CONSENT\n\n\
This survey maps psychosocial risks in the workplace for organizational improvement and NR-1 compliance.\n\n\
ANONYMITY: answers are confidential. No individual answer is shared with the company; \
results are only presented aggregated by group.\n\n\
LEGAL BASIS: data collection follows LGPD (Law 13.709/2018).";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SetupForm {
    // Identification
    pub legal_name: String,
    pub trade_name: String,
    pub cnpj: String,
    pub cnae: String,
    pub branch: String,

    // Headcount
    pub employee_count: u32,

    // GHE structure
    pub departments: Vec<String>,
    pub roles: Vec<String>,
    pub shifts: Vec<String>,

    // Demographics
    pub collect_age: bool,
    pub collect_gender: bool,
    pub collect_tenure: bool,

    // Privacy
    pub min_respondents: u32,
    pub consent_text: String,

    // Technical responsible
    pub responsible_name: String,
    pub responsible_email: String,
    pub responsible_role: String,
    pub responsible_register: String,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            legal_name: String::new(),
            trade_name: String::new(),
            cnpj: String::new(),
            cnae: String::new(),
            branch: String::new(),
            employee_count: 0,
            departments: Vec::new(),
            roles: Vec::new(),
            shifts: Vec::new(),
            collect_age: true,
            collect_gender: true,
            collect_tenure: true,
            min_respondents: MIN_RESPONDENTS_FLOOR,
            consent_text: DEFAULT_CONSENT_TEXT.to_string(),
            responsible_name: String::new(),
            responsible_email: String::new(),
            responsible_role: String::new(),
            responsible_register: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureList {
    Departments,
    Roles,
    Shifts,
}

impl SetupForm {
    pub fn copsoq_version(&self) -> Option<CopsoqVersion> {
        CopsoqVersion::for_headcount(self.employee_count)
    }

    pub fn company_size(&self) -> Option<CompanySize> {
        CompanySize::for_headcount(self.employee_count)
    }

    /// The company is registered under its trade name when one is given.
    pub fn display_name(&self) -> &str {
        if blank(&self.trade_name) {
            self.legal_name.trim()
        } else {
            self.trade_name.trim()
        }
    }

    fn list_mut(&mut self, list: StructureList) -> &mut Vec<String> {
        match list {
            StructureList::Departments => &mut self.departments,
            StructureList::Roles => &mut self.roles,
            StructureList::Shifts => &mut self.shifts,
        }
    }

    /// Blank entries are ignored. Returns whether the item was added.
    pub fn add_item(&mut self, list: StructureList, value: &str) -> bool {
        if blank(value) {
            return false;
        }
        self.list_mut(list).push(value.trim().to_string());
        true
    }

    pub fn remove_item(&mut self, list: StructureList, index: usize) -> Option<String> {
        let items = self.list_mut(list);
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }
}

impl WizardForm for SetupForm {
    const STEPS: &'static [&'static str] = &[
        "Identification",
        "Size & Version",
        "Structure (GHE)",
        "Demographics",
        "Privacy",
        "Technical Responsible",
    ];

    fn missing_fields(&self, step: usize) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match step {
            1 => {
                require(&mut missing, "legal_name", &self.legal_name);
                require(&mut missing, "trade_name", &self.trade_name);
                require(&mut missing, "cnpj", &self.cnpj);
                require(&mut missing, "cnae", &self.cnae);
            }
            2 => {
                if self.employee_count == 0 {
                    missing.push("employee_count");
                }
            }
            3 => {
                if !self.departments.iter().any(|d| !blank(d)) {
                    missing.push("departments");
                }
            }
            4 => {}
            5 => {
                if !(MIN_RESPONDENTS_FLOOR..=MIN_RESPONDENTS_CEIL).contains(&self.min_respondents) {
                    missing.push("min_respondents");
                }
                require(&mut missing, "consent_text", &self.consent_text);
            }
            6 => {
                require(&mut missing, "responsible_name", &self.responsible_name);
                require(&mut missing, "responsible_email", &self.responsible_email);
                require(&mut missing, "responsible_role", &self.responsible_role);
                require(&mut missing, "responsible_register", &self.responsible_register);
            }
            _ => {}
        }
        missing
    }
}

// ========== Professional signup ==========

pub const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignupForm {
    pub email: String,
    pub code: [String; CODE_LENGTH],
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub cpf: String,
    pub phone: String,
    pub crp: String,
    pub crp_region: String,
    pub photo: Option<String>,
}

impl SignupForm {
    /// Each code box holds at most one character; longer input is rejected.
    pub fn set_code_digit(&mut self, index: usize, value: &str) -> bool {
        if index >= CODE_LENGTH || value.chars().count() > 1 {
            return false;
        }
        self.code[index] = value.to_string();
        true
    }

    pub fn code(&self) -> String {
        self.code.concat()
    }
}

impl WizardForm for SignupForm {
    const STEPS: &'static [&'static str] = &[
        "Email",
        "Verification",
        "Password",
        "Personal Data",
        "Professional Data",
        "Profile Photo",
    ];

    fn missing_fields(&self, step: usize) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match step {
            1 => require(&mut missing, "email", &self.email),
            2 => {
                if self.code.iter().any(|d| d.is_empty()) {
                    missing.push("code");
                }
            }
            3 => {
                if self.password.is_empty() {
                    missing.push("password");
                }
                if self.confirm_password.is_empty() || self.confirm_password != self.password {
                    missing.push("confirm_password");
                }
            }
            4 => {
                require(&mut missing, "full_name", &self.full_name);
                require(&mut missing, "cpf", &self.cpf);
            }
            5 => {
                require(&mut missing, "crp", &self.crp);
                require(&mut missing, "crp_region", &self.crp_region);
            }
            // Photo is optional; the step can be skipped.
            6 => {}
            _ => {}
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_setup() -> SetupForm {
        SetupForm {
            legal_name: "Acme Industria Ltda".to_string(),
            trade_name: "Acme".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            cnae: "2512-8/00".to_string(),
            employee_count: 120,
            departments: vec!["Comercial".to_string(), "TI".to_string()],
            responsible_name: "Ana Souza".to_string(),
            responsible_email: "ana@acme.com.br".to_string(),
            responsible_role: "Psicóloga".to_string(),
            responsible_register: "CRP 06/12345".to_string(),
            ..SetupForm::default()
        }
    }

    fn complete_signup() -> SignupForm {
        SignupForm {
            email: "ana@acme.com.br".to_string(),
            code: ["1", "2", "3", "4", "5", "6"].map(String::from),
            password: "s3cret-pass".to_string(),
            confirm_password: "s3cret-pass".to_string(),
            full_name: "Ana Souza".to_string(),
            cpf: "123.456.789-00".to_string(),
            crp: "12345".to_string(),
            crp_region: "SP".to_string(),
            ..SignupForm::default()
        }
    }

    #[test]
    fn test_both_wizards_have_six_steps() {
        assert_eq!(Wizard::<SetupForm>::last_step(), 6);
        assert_eq!(Wizard::<SignupForm>::last_step(), 6);
    }

    #[test]
    fn test_setup_blocked_until_each_step_filled() {
        let mut wizard = Wizard::new(SetupForm::default());
        assert_eq!(wizard.step_title(), "Identification");
        assert!(!wizard.can_advance());
        assert!(matches!(
            wizard.next(),
            Err(WizardError::StepIncomplete { step: 1, .. })
        ));

        let full = complete_setup();
        wizard.form_mut().legal_name = full.legal_name.clone();
        wizard.form_mut().trade_name = full.trade_name.clone();
        wizard.form_mut().cnpj = full.cnpj.clone();
        assert_eq!(wizard.form().missing_fields(1), vec!["cnae"]);
        wizard.form_mut().cnae = full.cnae.clone();
        assert_eq!(wizard.next(), Ok(2));

        assert!(!wizard.can_advance());
        wizard.form_mut().employee_count = 30;
        assert_eq!(wizard.form().copsoq_version(), Some(CopsoqVersion::Short));
        assert_eq!(wizard.next(), Ok(3));

        assert!(!wizard.can_advance());
        assert!(!wizard.form_mut().add_item(StructureList::Departments, "   "));
        assert!(!wizard.can_advance());
        assert!(wizard.form_mut().add_item(StructureList::Departments, "Financeiro"));
        assert_eq!(wizard.next(), Ok(4));

        assert!(wizard.can_advance());
        assert_eq!(wizard.next(), Ok(5));

        wizard.form_mut().min_respondents = 2;
        assert_eq!(wizard.form().missing_fields(5), vec!["min_respondents"]);
        wizard.form_mut().min_respondents = 5;
        wizard.form_mut().consent_text.clear();
        assert_eq!(wizard.form().missing_fields(5), vec!["consent_text"]);
        wizard.form_mut().consent_text = DEFAULT_CONSENT_TEXT.to_string();
        assert_eq!(wizard.next(), Ok(6));

        assert!(wizard.is_last_step());
        assert!(!wizard.can_advance());
        wizard.form_mut().responsible_name = full.responsible_name;
        wizard.form_mut().responsible_email = full.responsible_email;
        wizard.form_mut().responsible_role = full.responsible_role;
        wizard.form_mut().responsible_register = full.responsible_register;
        assert!(wizard.can_advance());
        assert!(wizard.submit().is_ok());
    }

    #[test]
    fn test_every_required_field_gates_its_step() {
        let full = complete_setup();
        for step in 1..=6 {
            assert!(full.missing_fields(step).is_empty(), "setup step {step}");
        }
        let cleared: [(usize, fn(&mut SetupForm)); 11] = [
            (1, |f| f.legal_name.clear()),
            (1, |f| f.trade_name.clear()),
            (1, |f| f.cnpj.clear()),
            (1, |f| f.cnae.clear()),
            (2, |f| f.employee_count = 0),
            (3, |f| f.departments.clear()),
            (5, |f| f.consent_text.clear()),
            (6, |f| f.responsible_name.clear()),
            (6, |f| f.responsible_email.clear()),
            (6, |f| f.responsible_role.clear()),
            (6, |f| f.responsible_register.clear()),
        ];
        for (step, clear) in cleared {
            let mut form = complete_setup();
            clear(&mut form);
            assert_eq!(form.missing_fields(step).len(), 1, "setup step {step}");
        }

        let full = complete_signup();
        for step in 1..=6 {
            assert!(full.missing_fields(step).is_empty(), "signup step {step}");
        }
        let cleared: [(usize, fn(&mut SignupForm)); 7] = [
            (1, |f| f.email.clear()),
            (2, |f| f.code[3].clear()),
            (3, |f| f.confirm_password.clear()),
            (4, |f| f.full_name.clear()),
            (4, |f| f.cpf.clear()),
            (5, |f| f.crp.clear()),
            (5, |f| f.crp_region.clear()),
        ];
        for (step, clear) in cleared {
            let mut form = complete_signup();
            clear(&mut form);
            assert!(!form.missing_fields(step).is_empty(), "signup step {step}");
        }
    }

    #[test]
    fn test_optional_fields_do_not_gate() {
        let mut setup = complete_setup();
        setup.branch.clear();
        setup.roles.clear();
        setup.shifts.clear();
        assert!(validate_all(&setup).is_ok());

        let mut signup = complete_signup();
        signup.phone.clear();
        signup.photo = None;
        assert!(validate_all(&signup).is_ok());
    }

    #[test]
    fn test_signup_password_must_match() {
        let mut form = complete_signup();
        form.confirm_password = "different".to_string();
        assert_eq!(form.missing_fields(3), vec!["confirm_password"]);
        form.password.clear();
        form.confirm_password.clear();
        assert_eq!(form.missing_fields(3), vec!["password", "confirm_password"]);
    }

    #[test]
    fn test_signup_code_digits() {
        let mut form = SignupForm::default();
        assert!(!form.set_code_digit(0, "12"));
        assert!(!form.set_code_digit(6, "1"));
        for (i, d) in ["9", "8", "7", "6", "5"].iter().enumerate() {
            assert!(form.set_code_digit(i, d));
        }
        assert_eq!(form.missing_fields(2), vec!["code"]);
        assert!(form.set_code_digit(5, "4"));
        assert!(form.missing_fields(2).is_empty());
        assert_eq!(form.code(), "987654");
    }

    #[test]
    fn test_back_and_bounds() {
        let mut wizard = Wizard::new(complete_signup());
        assert_eq!(wizard.back(), 1);
        for expected in 2..=6 {
            assert_eq!(wizard.next(), Ok(expected));
        }
        assert_eq!(wizard.next(), Ok(6));
        assert_eq!(wizard.back(), 5);
        assert_eq!(wizard.step_title(), "Professional Data");
    }

    #[test]
    fn test_submit_reports_first_incomplete_step() {
        let mut form = complete_setup();
        form.departments.clear();
        form.responsible_email.clear();
        let err = Wizard::new(form).submit().unwrap_err();
        assert_eq!(
            err,
            WizardError::StepIncomplete {
                step: 3,
                missing: vec!["departments"]
            }
        );
        assert_eq!(err.to_string(), "step 3 is incomplete, missing: departments");
    }

    #[test]
    fn test_remove_item_and_display_name() {
        let mut form = complete_setup();
        assert_eq!(
            form.remove_item(StructureList::Departments, 0),
            Some("Comercial".to_string())
        );
        assert_eq!(form.remove_item(StructureList::Shifts, 0), None);
        assert_eq!(form.display_name(), "Acme");
        form.trade_name.clear();
        assert_eq!(form.display_name(), "Acme Industria Ltda");
    }
}
