#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSection {
    Location,
    Soil,
    Weather,
    Market,
    Rotation,
}

impl FormSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormSection::Location => "Location",
            FormSection::Soil => "Soil",
            FormSection::Weather => "Weather",
            FormSection::Market => "Market",
            FormSection::Rotation => "Crop Rotation",
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        FormField::all()
            .iter()
            .copied()
            .filter(|f| f.section() == *self)
            .collect()
    }
}

/// Every editable input on the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Latitude,
    Longitude,
    Ph,
    Moisture,
    Nitrogen,
    Phosphorus,
    Potassium,
    Rainfall,
    Temperature,
    DemandIndex,
    PriceIndex,
    RotationHistory,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Latitude,
            FormField::Longitude,
            FormField::Ph,
            FormField::Moisture,
            FormField::Nitrogen,
            FormField::Phosphorus,
            FormField::Potassium,
            FormField::Rainfall,
            FormField::Temperature,
            FormField::DemandIndex,
            FormField::PriceIndex,
            FormField::RotationHistory,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Latitude => "Latitude",
            FormField::Longitude => "Longitude",
            FormField::Ph => "pH",
            FormField::Moisture => "Moisture (%)",
            FormField::Nitrogen => "Nitrogen",
            FormField::Phosphorus => "Phosphorus",
            FormField::Potassium => "Potassium",
            FormField::Rainfall => "Rainfall (mm)",
            FormField::Temperature => "Temperature (°C)",
            FormField::DemandIndex => "Demand Index",
            FormField::PriceIndex => "Price Index",
            FormField::RotationHistory => "Previous Crops (comma separated)",
        }
    }

    pub fn section(&self) -> FormSection {
        match self {
            FormField::Latitude | FormField::Longitude => FormSection::Location,
            FormField::Ph
            | FormField::Moisture
            | FormField::Nitrogen
            | FormField::Phosphorus
            | FormField::Potassium => FormSection::Soil,
            FormField::Rainfall | FormField::Temperature => FormSection::Weather,
            FormField::DemandIndex | FormField::PriceIndex => FormSection::Market,
            FormField::RotationHistory => FormSection::Rotation,
        }
    }

    /// Free-text fields are stored verbatim; the rest must parse as numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            FormField::Latitude | FormField::Longitude | FormField::RotationHistory
        )
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = self.index();
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        let idx = self.index();
        all[(idx + all.len() - 1) % all.len()]
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }
}
